//! Unit tests for ba-behavior.

use ba_core::{EmotionKind, ScoreGraph, Timestamp};
use serde_json::{Value, json};

use crate::testing::{Call, CallLog, ProbeHandle, probe_slot};
use crate::{BehaviorSlot, World};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn t(ms: u64) -> Timestamp {
    Timestamp(ms)
}

fn probe(name: &str, extra: Value) -> (BehaviorSlot, ProbeHandle, CallLog) {
    let log = CallLog::new();
    let (slot, handle) = probe_slot(name, extra, &log);
    (slot, handle, log)
}

fn graph(points: &[(f32, f32)]) -> ScoreGraph {
    ScoreGraph::from_points(points).unwrap()
}

// ── Scorer ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scorer_tests {
    use super::*;
    use crate::BehaviorScorer;
    use ba_core::EmotionState;

    fn two_component_scorer() -> BehaviorScorer {
        let mut scorer = BehaviorScorer::new();
        // Happy: -1 → 0, 1 → 1
        scorer.add_component(EmotionKind::Happy, graph(&[(-1.0, 0.0), (1.0, 1.0)]), false);
        scorer.add_component(EmotionKind::Calm, ScoreGraph::constant(0.8), false);
        scorer
    }

    #[test]
    fn single_zero_component_vetoes() {
        let scorer = two_component_scorer();
        let mut emotions = EmotionState::new();
        emotions.set(EmotionKind::Happy, -1.0);
        for calm in [-1.0, 0.0, 1.0] {
            emotions.set(EmotionKind::Calm, calm);
            assert_eq!(scorer.evaluate(&emotions), 0.0);
        }
    }

    #[test]
    fn non_zero_components_average() {
        let scorer = two_component_scorer();
        let mut emotions = EmotionState::new();
        emotions.set(EmotionKind::Happy, 0.0); // → 0.5
        assert!((scorer.evaluate(&emotions) - 0.65).abs() < 1e-6);
    }

    #[test]
    fn empty_scorer_is_zero() {
        assert_eq!(BehaviorScorer::new().evaluate(&EmotionState::new()), 0.0);
    }

    #[test]
    fn negative_graph_output_vetoes() {
        let mut scorer = BehaviorScorer::new();
        scorer.add_component(EmotionKind::Brave, ScoreGraph::constant(-0.3), false);
        scorer.add_component(EmotionKind::Calm, ScoreGraph::constant(1.0), false);
        assert_eq!(scorer.evaluate(&EmotionState::new()), 0.0);
    }

    #[test]
    fn nan_emotion_fails_closed() {
        let scorer = two_component_scorer();
        let mut emotions = EmotionState::new();
        emotions.set(EmotionKind::Happy, f32::NAN);
        assert_eq!(scorer.evaluate(&emotions), 0.0);
    }

    #[test]
    fn track_delta_reads_recent_change() {
        let mut scorer = BehaviorScorer::new();
        scorer.add_component(EmotionKind::Excited, graph(&[(0.0, 0.0), (0.5, 1.0)]), true);
        let mut emotions = EmotionState::new();
        emotions.set(EmotionKind::Excited, 0.9);
        emotions.end_tick();
        assert_eq!(scorer.evaluate(&emotions), 0.0);
        emotions.add(EmotionKind::Excited, 0.1);
        // delta 0.1 → 0.2
        assert!((scorer.evaluate(&emotions) - 0.2).abs() < 1e-5);
    }

    #[test]
    fn clear_components_empties() {
        let mut scorer = two_component_scorer();
        scorer.clear_components();
        assert!(scorer.is_empty());
    }
}

// ── Penalties ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod penalty_tests {
    use super::*;
    use crate::{RepetitionPenalty, RunningPenalty};

    #[test]
    fn default_is_no_penalty() {
        let p = RepetitionPenalty::default();
        assert_eq!(p.evaluate(0.0), 1.0);
        assert_eq!(p.evaluate(1_000.0), 1.0);
    }

    #[test]
    fn decreasing_graph_rejected() {
        assert!(RepetitionPenalty::new(graph(&[(0.0, 1.0), (5.0, 0.5)])).is_err());
    }

    #[test]
    fn empty_graph_means_no_penalty() {
        let p = RepetitionPenalty::new(ScoreGraph::default()).unwrap();
        assert_eq!(p.evaluate(3.0), 1.0);
    }

    #[test]
    fn output_clamped_to_unit_interval() {
        let p = RepetitionPenalty::new(graph(&[(0.0, -0.5), (10.0, 2.0)])).unwrap();
        assert_eq!(p.evaluate(0.0), 0.0);
        assert_eq!(p.evaluate(10.0), 1.0);
    }

    #[test]
    fn running_penalty_may_decrease() {
        let p = RunningPenalty::new(graph(&[(0.0, 1.0), (10.0, 0.0)]));
        assert!((p.evaluate(5.0) - 0.5).abs() < 1e-6);
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod params_tests {
    use super::*;
    use crate::{BehaviorConfig, BehaviorError};

    fn config(v: Value) -> BehaviorConfig {
        BehaviorConfig::new(v).unwrap()
    }

    #[test]
    fn require_reports_missing_key() {
        let cfg = config(json!({}));
        let err = cfg.require::<u32>("coolDownDuration_ms").unwrap_err();
        assert!(matches!(err, BehaviorError::MissingKey(k) if k == "coolDownDuration_ms"));
    }

    #[test]
    fn wrong_type_is_invalid_value() {
        let cfg = config(json!({"coolDownDuration_ms": "soon"}));
        assert!(matches!(
            cfg.require::<u32>("coolDownDuration_ms"),
            Err(BehaviorError::InvalidValue { .. })
        ));
        assert!(cfg.get_or::<u32>("coolDownDuration_ms", 7).is_err());
    }

    #[test]
    fn optional_defaults() {
        let cfg = config(json!({"present": 3, "nothing": null}));
        assert_eq!(cfg.get_or("absent", 9u32).unwrap(), 9);
        assert_eq!(cfg.get_or("present", 9u32).unwrap(), 3);
        assert_eq!(cfg.optional::<u32>("nothing").unwrap(), None);
        assert!(!cfg.has("nothing"));
    }

    #[test]
    fn require_str_borrows() {
        let cfg = config(json!({"reactionAnimGroup": "wave_01", "n": 1}));
        assert_eq!(cfg.require_str("reactionAnimGroup").unwrap(), "wave_01");
        assert!(cfg.require_str("n").is_err());
        assert!(cfg.require_str("missing").is_err());
    }

    #[test]
    fn non_object_rejected() {
        assert!(BehaviorConfig::new(json!([1, 2])).is_err());
        assert!(BehaviorConfig::from_json_str("{").is_err());
    }
}

// ── Factory ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod factory_tests {
    use super::*;
    use crate::testing::PROBE_KIND;
    use crate::{BehaviorConfig, BehaviorError, BehaviorFactory, BehaviorGroup, EngineTag, EventTag, GameTag, NoopBehavior};

    #[test]
    fn noop_is_built_in() {
        let factory = BehaviorFactory::new();
        assert!(factory.is_registered(NoopBehavior::KIND));
        let slot = factory.create(NoopBehavior::KIND, &BehaviorConfig::default()).unwrap();
        assert_eq!(slot.name(), "NoOp");
        assert!(slot.body_as::<NoopBehavior>().is_some());
    }

    #[test]
    fn unknown_kind_is_error() {
        let factory = BehaviorFactory::new();
        let err = factory.create("Missing", &BehaviorConfig::default()).unwrap_err();
        assert!(matches!(err, BehaviorError::UnknownKind(_)));
    }

    #[test]
    fn common_keys_are_read() {
        let (slot, _, _) = probe(
            "Cliff",
            json!({
                "flatScore": 0.4,
                "behaviorGroups": ["ShortInterruption", "HardInterrupt"],
                "engineTriggers": [7],
                "gameTriggers": [3],
                "considerThisHasRunForBehaviorObjective": 5,
            }),
        );
        assert_eq!(slot.name(), "Cliff");
        assert_eq!(slot.kind(), PROBE_KIND);
        assert_eq!(slot.flat_score(), 0.4);
        assert!(slot.has_group(BehaviorGroup::ShortInterruption));
        assert!(slot.has_group(BehaviorGroup::HardInterrupt));
        assert!(!slot.has_group(BehaviorGroup::ResumeLimited));
        assert!(slot.is_reactionary());
        assert!(slot.is_triggered_by(EventTag::Engine(EngineTag(7))));
        assert!(slot.is_triggered_by(EventTag::Game(GameTag(3))));
        assert!(!slot.is_triggered_by(EventTag::Engine(EngineTag(3))));
        assert_eq!(slot.objective_cooldown().map(|o| o.0), Some(5));
    }

    #[test]
    fn emotion_scorers_parsed() {
        let (slot, _, _) = probe(
            "Social",
            json!({
                "emotionScorers": [
                    {"emotionType": "Social", "scoreGraph": {"nodes": [{"x": -1, "y": 0}, {"x": 1, "y": 1}]}},
                    {"emotionType": "Happy", "scoreGraph": {"nodes": [{"x": 0, "y": 1}]}, "trackDelta": true}
                ]
            }),
        );
        let components = slot.scorer().components();
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].emotion_type, EmotionKind::Social);
        assert!(!components[0].track_delta);
        assert!(components[1].track_delta);
    }

    #[test]
    fn rejects_bad_common_keys() {
        let mut factory = BehaviorFactory::new();
        let log = CallLog::new();
        crate::testing::register_probe(&mut factory, &log, Default::default());

        let bad = [
            json!({"name": "A", "repetitionPenalty": {"nodes": [{"x": 0, "y": 1}, {"x": 1, "y": 0}]}}),
            json!({"name": "A", "behaviorGroups": ["Sometimes"]}),
            json!({"name": "A", "flatScore": 0.5, "emotionScorers": [
                {"emotionType": "Calm", "scoreGraph": {"nodes": [{"x": 0, "y": 1}]}}
            ]}),
            json!({"name": "A", "emotionScorers": [
                {"emotionType": "Grumpy", "scoreGraph": {"nodes": [{"x": 0, "y": 1}]}}
            ]}),
            json!({}),
        ];
        for doc in bad {
            let cfg = BehaviorConfig::new(doc.clone()).unwrap();
            assert!(factory.create(PROBE_KIND, &cfg).is_err(), "accepted {doc}");
        }
    }

    #[test]
    fn create_noop_uses_given_name() {
        let slot = BehaviorFactory::new().create_noop("Fallback");
        assert_eq!(slot.name(), "Fallback");
        assert_eq!(slot.kind(), NoopBehavior::KIND);
    }
}

// ── Slot lifecycle ────────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle_tests {
    use super::*;
    use crate::{ContractViolation, Status};

    #[test]
    fn init_update_stop() {
        let (mut slot, probe, _) = probe("A", Value::Null);
        let mut world = World::new();
        slot.init(&mut world, t(0)).unwrap();
        assert!(slot.is_running());
        assert_eq!(slot.started_running_time(), Some(t(0)));
        assert_eq!(slot.state_name(), "Running");
        assert_eq!(slot.update(&mut world, t(100)), Ok(Status::Running));
        slot.stop(&mut world, t(200));
        assert!(!slot.is_running());
        assert_eq!(slot.last_run_time(), Some(t(200)));
        assert_eq!(slot.state_name(), "Stopped");
        assert_eq!(
            probe.lifecycle(),
            vec![Call::Init { resuming: false }, Call::Update, Call::Stop]
        );
    }

    #[test]
    #[should_panic(expected = "already running")]
    fn double_init_panics() {
        let (mut slot, _, _) = probe("A", Value::Null);
        let mut world = World::new();
        slot.init(&mut world, t(0)).unwrap();
        let _ = slot.init(&mut world, t(1));
    }

    #[test]
    fn update_while_idle_is_contract_violation() {
        let (mut slot, probe, _) = probe("A", Value::Null);
        let mut world = World::new();
        assert_eq!(
            slot.update(&mut world, t(0)),
            Err(ContractViolation::UpdateWhileNotRunning("A".into()))
        );
        assert!(probe.calls().is_empty());
    }

    #[test]
    fn stop_is_idempotent_and_safe_without_init() {
        let (mut slot, probe, _) = probe("A", Value::Null);
        let mut world = World::new();
        slot.stop(&mut world, t(0));
        assert_eq!(slot.last_run_time(), None);

        slot.init(&mut world, t(10)).unwrap();
        slot.stop(&mut world, t(20));
        slot.stop(&mut world, t(30));
        assert_eq!(slot.last_run_time(), Some(t(20)));
        assert_eq!(probe.lifecycle(), vec![Call::Init { resuming: false }, Call::Stop]);
    }

    #[test]
    fn interrupt_on_idle_is_noop() {
        let (mut slot, probe, _) = probe("A", Value::Null);
        let mut world = World::new();
        assert!(slot.interrupt(&mut world, t(0), false).is_ok());
        assert!(probe.calls().is_empty());
    }

    #[test]
    fn interrupt_refusal_is_repeatable() {
        let (mut slot, probe, _) = probe("A", Value::Null);
        let mut world = World::new();
        slot.init(&mut world, t(0)).unwrap();
        probe.refuse_interrupts(1);
        assert!(slot.interrupt(&mut world, t(10), true).is_err());
        assert_eq!(slot.state_name(), "Busy");
        assert!(slot.is_running());
        assert!(slot.interrupt(&mut world, t(20), true).is_ok());
        assert!(slot.interrupt(&mut world, t(30), true).is_ok());
        assert!(slot.is_running());
    }

    #[test]
    fn failed_init_backs_off_for_one_second() {
        let (mut slot, probe, _) = probe("A", Value::Null);
        let mut world = World::new();
        probe.set_init_fails(true);
        assert!(slot.init(&mut world, t(1_000)).is_err());
        assert!(!slot.is_running());
        probe.set_init_fails(false);
        assert!(!slot.is_runnable(&world, t(1_500)));
        assert!(slot.is_runnable(&world, t(2_000)));
    }

    #[test]
    fn stop_cancels_owned_actions() {
        let (mut slot, probe, _) = probe("A", Value::Null);
        let mut world = World::new();
        probe.set_action_on_init(true);
        slot.init(&mut world, t(0)).unwrap();
        assert_eq!(world.actions.len(), 1);
        assert_eq!(world.actions.owner_of(probe.last_action().unwrap()), Some(slot.id()));
        slot.stop(&mut world, t(10));
        assert!(world.actions.is_empty());
    }

    #[test]
    fn limited_resume_refused_at_limit() {
        let (mut slot, probe, _) = probe("A", Value::Null);
        let mut world = World::new();
        slot.init(&mut world, t(0)).unwrap();
        slot.stop(&mut world, t(100));

        slot.resume(&mut world, t(200), true).unwrap();
        slot.stop(&mut world, t(300));
        assert!(slot.resume(&mut world, t(400), true).is_err());
        assert!(!slot.is_running());
        assert!(!slot.is_runnable(&world, t(15_399)));
        assert!(slot.is_runnable(&world, t(15_400)));

        assert_eq!(
            probe.lifecycle(),
            vec![
                Call::Init { resuming: false },
                Call::Stop,
                Call::Init { resuming: true },
                Call::Stop,
            ]
        );
    }

    #[test]
    fn unlimited_resume_always_allowed() {
        let (mut slot, _, _) = probe("A", Value::Null);
        let mut world = World::new();
        for i in 0..5 {
            slot.resume(&mut world, t(i * 100), false).unwrap();
            slot.stop(&mut world, t(i * 100 + 50));
        }
        assert_eq!(slot.activations(), 5);
    }
}

// ── Scoring through the slot ──────────────────────────────────────────────────

#[cfg(test)]
mod score_tests {
    use super::*;

    fn penalized() -> Value {
        json!({
            "flatScore": 0.5,
            "repetitionPenalty": {"nodes": [{"x": 0, "y": 0.2}, {"x": 10, "y": 1}]},
        })
    }

    #[test]
    fn not_runnable_scores_zero() {
        let (slot, probe, _) = probe("A", json!({"flatScore": 0.5}));
        let world = World::new();
        probe.set_runnable(false);
        assert_eq!(slot.evaluate_score(&world, t(0)), 0.0);
    }

    #[test]
    fn flat_score_used_without_scorer() {
        let (slot, _, _) = probe("A", json!({"flatScore": 0.5}));
        assert_eq!(slot.evaluate_score(&World::new(), t(0)), 0.5);
    }

    #[test]
    fn override_beats_body_and_scorer() {
        let (mut slot, probe, _) = probe("A", json!({"flatScore": 0.5}));
        let world = World::new();
        probe.set_score(Some(0.9));
        assert_eq!(slot.evaluate_score(&world, t(0)), 0.9);
        slot.set_override_score(Some(0.1));
        assert_eq!(slot.evaluate_score(&world, t(0)), 0.1);
    }

    #[test]
    fn repetition_penalty_after_run() {
        let (mut slot, _, _) = probe("A", penalized());
        let mut world = World::new();
        assert_eq!(slot.evaluate_score(&world, t(0)), 0.5);
        slot.init(&mut world, t(0)).unwrap();
        slot.stop(&mut world, t(1_000));
        // 5 s after → penalty 0.6
        assert!((slot.evaluate_score(&world, t(6_000)) - 0.3).abs() < 1e-6);
        assert!((slot.evaluate_score(&world, t(20_000)) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn grace_window_skips_penalty() {
        let (mut slot, _, _) = probe("A", penalized());
        let mut world = World::new();
        slot.init(&mut world, t(0)).unwrap();
        slot.stop_without_immediate_repetition_penalty(&mut world, t(1_000));
        assert_eq!(slot.evaluate_score(&world, t(1_500)), 0.5);
        // 1 s after stop → 0.28
        assert!((slot.evaluate_score(&world, t(2_000)) - 0.14).abs() < 1e-6);
    }

    #[test]
    fn running_penalty_while_running() {
        let (mut slot, _, _) = probe(
            "A",
            json!({
                "flatScore": 0.5,
                "runningPenalty": {"nodes": [{"x": 0, "y": 1}, {"x": 10, "y": 0}]},
            }),
        );
        let mut world = World::new();
        slot.init(&mut world, t(0)).unwrap();
        assert!((slot.evaluate_score(&world, t(5_000)) - 0.25).abs() < 1e-6);
        assert_eq!(slot.evaluate_score(&world, t(10_000)), 0.0);
    }

    #[test]
    fn running_behavior_scores_even_if_not_runnable() {
        let (mut slot, probe, _) = probe("A", json!({"flatScore": 0.5}));
        let mut world = World::new();
        slot.init(&mut world, t(0)).unwrap();
        probe.set_runnable(false);
        assert_eq!(slot.evaluate_score(&world, t(10)), 0.5);
    }

    #[test]
    fn acting_bonus_lasts_while_the_action_is_in_flight() {
        let (mut slot, probe, _) = probe("A", json!({"flatScore": 0.5}));
        let mut world = World::new();
        probe.set_action_on_init(true);
        probe.set_acting_bonus(0.3);
        slot.init(&mut world, t(0)).unwrap();
        assert!((slot.evaluate_score(&world, t(10)) - 0.8).abs() < 1e-6);

        let tag = probe.last_action().unwrap();
        world.actions.finish(tag);
        assert_eq!(slot.evaluate_score(&world, t(20)), 0.5);
    }

    #[test]
    fn stop_drops_acting_bonus() {
        let (mut slot, probe, _) = probe("A", json!({"flatScore": 0.5}));
        let mut world = World::new();
        probe.set_action_on_init(true);
        probe.set_acting_bonus(0.4);
        slot.init(&mut world, t(0)).unwrap();
        slot.stop(&mut world, t(100));
        assert_eq!(world.actions.extra_score_of(slot.id()), 0.0);
        assert_eq!(slot.evaluate_score(&world, t(200)), 0.5);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let (mut slot, _, _) = probe("A", penalized());
        let mut world = World::new();
        slot.init(&mut world, t(0)).unwrap();
        slot.stop(&mut world, t(1_000));
        let a = slot.evaluate_score(&world, t(3_300));
        let b = slot.evaluate_score(&world, t(3_300));
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn anomalous_scores_are_zero() {
        let (mut slot, probe, _) = probe("A", Value::Null);
        let world = World::new();
        probe.set_score(Some(f32::NAN));
        assert_eq!(slot.evaluate_score(&world, t(0)), 0.0);
        slot.set_override_score(Some(-2.0));
        assert_eq!(slot.evaluate_score(&world, t(0)), 0.0);
    }

    #[test]
    fn emotion_scorer_feeds_slot_score() {
        let (slot, _, _) = probe(
            "A",
            json!({"emotionScorers": [
                {"emotionType": "Happy", "scoreGraph": {"nodes": [{"x": -1, "y": 0}, {"x": 1, "y": 1}]}}
            ]}),
        );
        let mut world = World::new();
        world.emotions.set(EmotionKind::Happy, 1.0);
        assert_eq!(slot.evaluate_score(&world, t(0)), 1.0);
        world.emotions.set(EmotionKind::Happy, -1.0);
        assert_eq!(slot.evaluate_score(&world, t(0)), 0.0);
    }
}

// ── Events ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod event_tests {
    use super::*;
    use crate::{ActionResult, EngineTag, Event, EventTag, GameTag};
    use ba_core::{ActionTag, ObjectiveId};

    const BUMP: EngineTag = EngineTag(12);

    fn subscribed() -> Value {
        json!({"subscribeEngine": [12]})
    }

    #[test]
    fn always_handler_runs_first_while_idle() {
        let (mut slot, probe, _) = probe("A", subscribed());
        let mut world = World::new();
        slot.handle_event(&Event::bare(BUMP), &mut world, t(0));
        let tag = EventTag::from(BUMP);
        assert_eq!(probe.calls(), vec![Call::Always(tag), Call::WhileNotRunning(tag)]);
    }

    #[test]
    fn always_handler_runs_first_while_running() {
        let (mut slot, probe, log) = probe("A", subscribed());
        let mut world = World::new();
        slot.init(&mut world, t(0)).unwrap();
        log.clear();
        slot.handle_event(&Event::bare(BUMP), &mut world, t(10));
        let tag = EventTag::from(BUMP);
        assert_eq!(probe.calls(), vec![Call::Always(tag), Call::WhileRunning(tag)]);
    }

    #[test]
    fn unsubscribed_events_not_delivered() {
        let (mut slot, probe, _) = probe("A", subscribed());
        let mut world = World::new();
        slot.handle_event(&Event::bare(EngineTag(13)), &mut world, t(0));
        slot.handle_event(&Event::bare(GameTag(12)), &mut world, t(0));
        assert!(probe.calls().is_empty());
    }

    #[test]
    fn objective_stamps_last_run_time() {
        let (mut slot, _, _) = probe("A", json!({"considerThisHasRunForBehaviorObjective": 4}));
        let mut world = World::new();
        slot.handle_event(&Event::objective_achieved(ObjectiveId(3)), &mut world, t(500));
        assert_eq!(slot.last_run_time(), None);
        slot.handle_event(&Event::objective_achieved(ObjectiveId(4)), &mut world, t(900));
        assert_eq!(slot.last_run_time(), Some(t(900)));
    }

    #[test]
    fn completion_reaches_running_body_only() {
        let (mut slot, probe, log) = probe("A", Value::Null);
        let mut world = World::new();
        let completion = crate::ActionCompletion { tag: ActionTag(9), result: ActionResult::Success };
        slot.handle_action_completed(completion, &mut world);
        assert!(probe.calls().is_empty());

        slot.init(&mut world, t(0)).unwrap();
        log.clear();
        slot.handle_action_completed(completion, &mut world);
        assert_eq!(probe.calls(), vec![Call::ActionCompleted(ActionTag(9))]);
    }

    #[test]
    fn payload_accessors() {
        let e = Event::action_completed(ActionTag(2), ActionResult::Failure);
        assert_eq!(e.as_action_completion().map(|c| c.result), Some(ActionResult::Failure));
        assert!(e.as_objective().is_none());
        // Wrong payload under the completion tag is not a completion.
        assert!(Event::bare(EngineTag::ROBOT_COMPLETED_ACTION).as_action_completion().is_none());
        assert_eq!(EventTag::from(GameTag(5)).to_string(), "game:5");
    }
}

// ── Arena / queue / blackboard ────────────────────────────────────────────────

#[cfg(test)]
mod arena_tests {
    use super::*;
    use crate::{BehaviorArena, BehaviorError};

    #[test]
    fn insertion_order_and_lookup() {
        let log = CallLog::new();
        let mut arena = BehaviorArena::new();
        for name in ["A", "B", "C"] {
            arena.insert(probe_slot(name, Value::Null, &log).0).unwrap();
        }
        let names: Vec<&str> = arena.iter().map(BehaviorSlot::name).collect();
        assert_eq!(names, ["A", "B", "C"]);
        let b = arena.id_of("B").unwrap();
        assert_eq!(b.index(), 1);
        assert_eq!(arena.get(b).map(BehaviorSlot::id), Some(b));
        assert!(arena.get_by_name("D").is_none());
    }

    #[test]
    fn duplicate_names_rejected() {
        let log = CallLog::new();
        let mut arena = BehaviorArena::new();
        arena.insert(probe_slot("A", Value::Null, &log).0).unwrap();
        let err = arena.insert(probe_slot("A", Value::Null, &log).0).unwrap_err();
        assert!(matches!(err, BehaviorError::DuplicateName(_)));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn stop_all_leaves_nothing_running() {
        let log = CallLog::new();
        let mut arena = BehaviorArena::new();
        let a = arena.insert(probe_slot("A", Value::Null, &log).0).unwrap();
        let mut world = World::new();
        arena.get_mut(a).unwrap().init(&mut world, t(0)).unwrap();
        assert_eq!(arena.running(), Some(a));
        arena.stop_all(&mut world, t(5));
        assert_eq!(arena.running(), None);
        assert_eq!(log.lifecycle_of("A"), vec![Call::Init { resuming: false }, Call::Stop]);
    }
}

#[cfg(test)]
mod action_tests {
    use crate::{ActionQueue, QueueSlot, World};
    use ba_core::{ActionTag, BehaviorId};

    #[test]
    fn tags_are_unique_and_owned() {
        let mut q = ActionQueue::new();
        let a = q.start(BehaviorId(0), QueueSlot::DEFAULT, "drive", vec![]);
        let b = q.start(BehaviorId(1), QueueSlot(1), "blink", vec![1]);
        assert_ne!(a, b);
        assert_eq!(q.owner_of(b), Some(BehaviorId(1)));
        assert_eq!(q.in_slot(QueueSlot(1)).count(), 1);
    }

    #[test]
    fn finish_and_cancel() {
        let mut q = ActionQueue::new();
        let a = q.start(BehaviorId(0), QueueSlot::DEFAULT, "drive", vec![]);
        let _ = q.start(BehaviorId(0), QueueSlot::DEFAULT, "turn", vec![]);
        let c = q.start(BehaviorId(2), QueueSlot::DEFAULT, "lift", vec![]);
        assert_eq!(q.finish(a).map(|x| x.owner), Some(BehaviorId(0)));
        assert!(q.finish(a).is_none());
        assert_eq!(q.cancel_owned_by(BehaviorId(0)), 1);
        assert_eq!(q.len(), 1);
        assert!(q.cancel(c).is_some());
        assert!(q.cancel(ActionTag(77)).is_none());
        assert!(q.is_empty());
    }

    #[test]
    fn extra_score_accumulates_on_latest_action() {
        let mut world = World::new();
        let mut view = world.view_mut(BehaviorId(1));
        assert!(!view.increase_score_while_acting(0.5));
        let first = view.start_action_extra_score(QueueSlot::DEFAULT, "drive", vec![], 0.1);
        let _ = view.start_action(QueueSlot::DEFAULT, "turn", vec![]);
        assert!(view.increase_score_while_acting(0.2));
        assert!(view.increase_score_while_acting(0.2));
        assert!((world.actions.extra_score_of(BehaviorId(1)) - 0.5).abs() < 1e-6);

        world.actions.finish(first);
        assert!((world.actions.extra_score_of(BehaviorId(1)) - 0.4).abs() < 1e-6);
        assert_eq!(world.actions.extra_score_of(BehaviorId(2)), 0.0);
    }

    #[test]
    fn view_cannot_cancel_foreign_actions() {
        let mut world = World::new();
        let foreign = world.actions.start(BehaviorId(5), QueueSlot::DEFAULT, "x", vec![]);
        let mut view = world.view_mut(BehaviorId(1));
        let mine = view.start_action(QueueSlot::DEFAULT, "y", vec![]);
        assert!(!view.cancel_action(foreign));
        assert!(view.has_pending_actions());
        assert!(view.cancel_action(mine));
        assert!(!view.has_pending_actions());
        assert_eq!(world.actions.len(), 1);
    }
}

#[cfg(test)]
mod blackboard_tests {
    use crate::Blackboard;

    #[derive(Debug, PartialEq)]
    struct FacePose(i32);
    struct CliffSeen;

    #[test]
    fn insert_get_replace_remove() {
        let mut facts = Blackboard::new();
        assert!(facts.insert(FacePose(1)).is_none());
        assert_eq!(facts.insert(FacePose(2)), Some(FacePose(1)));
        facts.insert(CliffSeen);
        assert_eq!(facts.len(), 2);
        if let Some(p) = facts.get_mut::<FacePose>() {
            p.0 += 1;
        }
        assert_eq!(facts.get::<FacePose>(), Some(&FacePose(3)));
        assert_eq!(facts.remove::<FacePose>(), Some(FacePose(3)));
        assert!(!facts.contains::<FacePose>());
        assert!(facts.contains::<CliffSeen>());
    }
}

#[cfg(test)]
mod group_tests {
    use crate::BehaviorGroup;

    #[test]
    fn parse_set_and_reject_unknown() {
        let set = BehaviorGroup::parse_set(["ShortInterruption", "ResumeLimited"]).unwrap();
        assert!(set.contains(BehaviorGroup::ShortInterruption));
        assert!(set.contains(BehaviorGroup::ResumeLimited));
        assert!(!set.contains(BehaviorGroup::HardInterrupt));
        assert!(BehaviorGroup::parse_set(["shortinterruption"]).is_err());
    }
}
