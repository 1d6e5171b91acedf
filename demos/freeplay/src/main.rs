//! freeplay — scripted demo of the behavior arbitration engine.
//!
//! Runs a reactionary "freeplay" chooser for 30 simulated seconds while a
//! script nudges emotions and fires stimuli (a cliff, a face, being picked
//! up), then switches the robot into a "sleeping" mode with an explicitly
//! selected behavior.  A fake engine completes every queued action after a
//! fixed delay.
//!
//! ```text
//! cargo run -p freeplay                       # bundled chooser config
//! cargo run -p freeplay -- my_chooser.json    # custom freeplay chooser
//! RUST_LOG=debug cargo run -p freeplay        # arbitration internals
//! ```

mod behaviors;
mod engine;


use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use ba_arbiter::{ArbiterBuilder, ArbiterObserver, StopReason};
use ba_behavior::{BehaviorFactory, BehaviorSlot, EngineTag, Event, GameTag};
use ba_chooser::load_chooser_str;
use ba_core::{ArbiterConfig, EmotionKind, Timestamp};

use behaviors::{CLIFF_DETECTED, FACE_SEEN, PICKED_UP, ReactToStimulus};
use engine::FakeEngine;

// ── Constants ─────────────────────────────────────────────────────────────────

const TICK_MS:   u64 = 100;
const SIM_MS:    u64 = 30_000;
const ACTION_MS: u64 = 800;    // every fake action takes this long

const ARBITER_JSON:  &str = include_str!("../config/arbiter.json");
const FREEPLAY_JSON: &str = include_str!("../config/freeplay.json");
const SLEEPING_JSON: &str = include_str!("../config/sleeping.json");

// ── Script ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
enum Cue {
    Emotion(EmotionKind, f32),
    Engine(EngineTag),
    Game(GameTag),
    Sleepy,
    Select(&'static str),
}

const SCRIPT: &[(u64, Cue)] = &[
    (500,    Cue::Emotion(EmotionKind::Stimulated, 0.6)),
    (3_000,  Cue::Engine(CLIFF_DETECTED)),
    (6_000,  Cue::Game(FACE_SEEN)),
    (7_000,  Cue::Game(FACE_SEEN)),          // still cooling down; ignored
    (10_000, Cue::Emotion(EmotionKind::Stimulated, -0.8)),
    (10_000, Cue::Emotion(EmotionKind::Calm, 0.9)),
    (14_000, Cue::Engine(PICKED_UP)),
    (18_000, Cue::Emotion(EmotionKind::Calm, 0.1)),
    (18_000, Cue::Emotion(EmotionKind::Stimulated, 0.4)),
    (22_000, Cue::Sleepy),
    (22_500, Cue::Select("Sleep")),
];

// ── Observer ──────────────────────────────────────────────────────────────────

/// Prints every lifecycle transition.
struct TransitionPrinter;

impl ArbiterObserver for TransitionPrinter {
    fn on_behavior_started(&mut self, slot: &BehaviorSlot, resuming: bool, now: Timestamp) {
        let how = if resuming { "resumed" } else { "started" };
        println!("[{now}] {how:<8} {}", slot.name());
    }

    fn on_behavior_stopped(&mut self, slot: &BehaviorSlot, reason: StopReason, now: Timestamp) {
        println!("[{now}] stopped  {} ({reason:?})", slot.name());
    }

    fn on_interrupt_refused(&mut self, slot: &BehaviorSlot, now: Timestamp) {
        println!("[{now}] refused  {} ({})", slot.name(), slot.state_name());
    }

    fn on_reaction(&mut self, reaction: &BehaviorSlot, event: &Event, now: Timestamp) {
        println!("[{now}] reacting {} to {}", reaction.name(), event.tag);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let freeplay_json = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading chooser config {path}"))?,
        None => FREEPLAY_JSON.to_string(),
    };

    println!("=== freeplay — behavior arbitration demo ===");

    // 1. Behavior kinds.
    let mut factory = BehaviorFactory::new();
    behaviors::register_all(&mut factory);
    println!("Behavior kinds: {}", factory.kinds().join(", "));

    // 2. Arbiter with the freeplay chooser.
    let config = ArbiterConfig::from_json_str(ARBITER_JSON).context("parsing arbiter config")?;
    let mut builder = ArbiterBuilder::new(config);
    let sleeping_rng = builder.chooser_rng();
    let mut arbiter = builder
        .observer(TransitionPrinter)
        .chooser_json(&freeplay_json, &factory)
        .context("loading freeplay chooser")?
        .build()?;
    println!(
        "Chooser {:?}: {} behaviors",
        arbiter.chooser().name(),
        arbiter.chooser().arena().len()
    );
    for slot in arbiter.chooser().arena().iter() {
        if let Some(body) = slot.body_as::<ReactToStimulus>() {
            println!(
                "  {:<14} plays {:<8} cooldown {} ms",
                slot.name(),
                body.anim_group(),
                body.cool_down_duration_ms()
            );
        }
    }
    let mut sleeping = Some(
        load_chooser_str(SLEEPING_JSON, &factory, sleeping_rng).context("loading sleeping chooser")?,
    );
    println!();

    // 3. Tick loop.
    let mut engine = FakeEngine::new(ACTION_MS);
    let mut script = SCRIPT.iter().peekable();
    let mut now = 0;
    while now <= SIM_MS {
        while let Some((_, cue)) = script.next_if(|(at, _)| *at <= now) {
            match *cue {
                Cue::Emotion(kind, value) => arbiter.world_mut().emotions.set(kind, value),
                Cue::Engine(tag) => arbiter.post_event(Event::bare(tag)),
                Cue::Game(tag) => arbiter.post_event(Event::bare(tag)),
                Cue::Sleepy => {
                    if let Some(chooser) = sleeping.take() {
                        arbiter.set_chooser(chooser);
                    }
                }
                Cue::Select(name) => {
                    arbiter.select_behavior_by_name(name);
                }
            }
        }

        arbiter.tick(Timestamp(now))?;
        for event in engine.poll(arbiter.world().actions.pending(), Timestamp(now)) {
            arbiter.post_event(event);
        }
        arbiter.world_mut().emotions.decay(TICK_MS as f32 / 1_000.0, 0.02);
        now += TICK_MS;
    }

    // 4. Summary.
    println!();
    println!(
        "Finished at {} in mode {:?}; active: {}",
        arbiter.now(),
        arbiter.chooser().name(),
        arbiter.active_name().unwrap_or("nothing")
    );
    arbiter.shutdown();
    Ok(())
}
