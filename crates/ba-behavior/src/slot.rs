//! `BehaviorSlot` — lifecycle wrapper around one behavior body.
//!
//! The slot is the sole writer of `is_running`, `state_name` and the
//! activation timestamps.  Bodies only see calls that are legal in the
//! current state:
//!
//! ```text
//!            init ok                  update → Complete/Failure
//!  Idle ──────────────► Running ──────────────────────────────┐
//!   ▲  init err: idle     │  interrupt (advisory, repeatable) │
//!   │  for 1 s            ▼                                   │
//!   └────────────────── stop ◄────────────────────────────────┘
//! ```
//!
//! Construction goes through [`BehaviorFactory`][crate::BehaviorFactory]; the
//! slot has no public constructor.

use ba_core::{BehaviorId, ObjectiveId, Timestamp};
use flagset::FlagSet;
use tracing::{debug, info, warn};

use crate::{
    ActionCompletion, Behavior, BehaviorFail, BehaviorGroup, BehaviorScorer, ContractViolation,
    Event, EventTag, RepetitionPenalty, RunningPenalty, Status, World,
};

/// After `stop_without_immediate_repetition_penalty`, the repetition penalty
/// is skipped for this long.
pub const REPETITION_GRACE_MS: u64 = 1_000;

/// A failed `init` keeps the behavior non-runnable for this long.
pub const INIT_FAILURE_BACKOFF_MS: u64 = 1_000;

/// Limited resumes allowed per activation; reaching the limit refuses the
/// resume.
pub const MAX_LIMITED_RESUMES: u32 = 2;

/// Non-runnable period after a refused limited resume.
pub const RESUME_COOLDOWN_MS: u64 = 15_000;

/// Slot-level settings read from the common config keys.
#[derive(Clone, Debug, Default)]
pub(crate) struct SlotSettings {
    pub name:               Option<String>,
    pub override_score:     Option<f32>,
    pub flat_score:         f32,
    pub scorer:             BehaviorScorer,
    pub repetition_penalty: RepetitionPenalty,
    pub running_penalty:    RunningPenalty,
    pub groups:             FlagSet<BehaviorGroup>,
    pub triggers:           Vec<EventTag>,
    pub objective_cooldown: Option<ObjectiveId>,
}

pub struct BehaviorSlot {
    id:         BehaviorId,
    name:       String,
    state_name: String,
    running:    bool,

    last_run_time:        Option<Timestamp>,
    started_running_time: Option<Timestamp>,
    activations:          u64,

    override_score:     Option<f32>,
    flat_score:         f32,
    scorer:             BehaviorScorer,
    repetition_penalty: RepetitionPenalty,
    running_penalty:    RunningPenalty,

    groups:             FlagSet<BehaviorGroup>,
    subscriptions:      Vec<EventTag>,
    triggers:           Vec<EventTag>,
    objective_cooldown: Option<ObjectiveId>,

    repetition_penalty_applies_at: Timestamp,
    runnable_after:                Timestamp,
    limited_resumes:               u32,

    body: Box<dyn Behavior>,
}

impl BehaviorSlot {
    pub(crate) fn new(body: Box<dyn Behavior>, settings: SlotSettings) -> Self {
        let name = settings.name.unwrap_or_else(|| body.kind().to_string());
        let subscriptions = body.subscriptions().to_vec();
        let state_name = body.state_name().to_string();
        Self {
            id: BehaviorId::INVALID,
            name,
            state_name,
            running: false,
            last_run_time: None,
            started_running_time: None,
            activations: 0,
            override_score: settings.override_score,
            flat_score: settings.flat_score,
            scorer: settings.scorer,
            repetition_penalty: settings.repetition_penalty,
            running_penalty: settings.running_penalty,
            groups: settings.groups,
            subscriptions,
            triggers: settings.triggers,
            objective_cooldown: settings.objective_cooldown,
            repetition_penalty_applies_at: Timestamp::ZERO,
            runnable_after: Timestamp::ZERO,
            limited_resumes: 0,
            body,
        }
    }

    /// Assigned once by the owning arena.
    pub(crate) fn set_id(&mut self, id: BehaviorId) {
        self.id = id;
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> BehaviorId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> &str {
        self.body.kind()
    }

    #[inline]
    pub fn state_name(&self) -> &str {
        &self.state_name
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn last_run_time(&self) -> Option<Timestamp> {
        self.last_run_time
    }

    #[inline]
    pub fn started_running_time(&self) -> Option<Timestamp> {
        self.started_running_time
    }

    /// Number of successful `init`s, resumes included.
    #[inline]
    pub fn activations(&self) -> u64 {
        self.activations
    }

    #[inline]
    pub fn override_score(&self) -> Option<f32> {
        self.override_score
    }

    pub fn set_override_score(&mut self, score: Option<f32>) {
        self.override_score = score;
    }

    #[inline]
    pub fn flat_score(&self) -> f32 {
        self.flat_score
    }

    #[inline]
    pub fn scorer(&self) -> &BehaviorScorer {
        &self.scorer
    }

    #[inline]
    pub fn repetition_penalty(&self) -> &RepetitionPenalty {
        &self.repetition_penalty
    }

    #[inline]
    pub fn running_penalty(&self) -> &RunningPenalty {
        &self.running_penalty
    }

    #[inline]
    pub fn groups(&self) -> FlagSet<BehaviorGroup> {
        self.groups
    }

    #[inline]
    pub fn has_group(&self, group: BehaviorGroup) -> bool {
        self.groups.contains(group)
    }

    #[inline]
    pub fn objective_cooldown(&self) -> Option<ObjectiveId> {
        self.objective_cooldown
    }

    #[inline]
    pub fn subscriptions(&self) -> &[EventTag] {
        &self.subscriptions
    }

    #[inline]
    pub fn triggers(&self) -> &[EventTag] {
        &self.triggers
    }

    /// `true` if this behavior can preempt on a matching event.
    #[inline]
    pub fn is_reactionary(&self) -> bool {
        !self.triggers.is_empty()
    }

    #[inline]
    pub fn is_triggered_by(&self, tag: EventTag) -> bool {
        self.triggers.contains(&tag)
    }

    #[inline]
    pub fn is_subscribed(&self, tag: EventTag) -> bool {
        self.subscriptions.contains(&tag)
    }

    /// Downcast the body to its concrete type.
    pub fn body_as<T: Behavior>(&self) -> Option<&T> {
        (*self.body).as_any().downcast_ref::<T>()
    }

    pub fn body_as_mut<T: Behavior>(&mut self) -> Option<&mut T> {
        (*self.body).as_any_mut().downcast_mut::<T>()
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Let the body refresh cached targets ahead of this tick's queries.
    pub fn refresh(&mut self, world: &World, now: Timestamp) {
        self.body.refresh(world.view(), now);
    }

    /// Whether the behavior may start (or, while running, keep going) now.
    pub fn is_runnable(&self, world: &World, now: Timestamp) -> bool {
        if now < self.runnable_after {
            return false;
        }
        if self.running {
            self.body.is_runnable_while_running(world.view(), now)
        } else {
            self.body.is_runnable(world.view(), now)
        }
    }

    /// Desirability score; `0.0` means "do not pick".
    ///
    /// The base score is `override_score` if set, else the body's own score,
    /// else the emotion scorer (or the flat score when the scorer has no
    /// components).  A running behavior adds the score bonus of the actions
    /// it has in flight, then is scaled by its running penalty; an
    /// idle one that has run before by its repetition penalty, except inside
    /// the grace window.  Pure in `(world, now, slot state)`.
    pub fn evaluate_score(&self, world: &World, now: Timestamp) -> f32 {
        if !self.running && !self.is_runnable(world, now) {
            return 0.0;
        }

        let mut base = match self.override_score {
            Some(score) => score,
            None => self.body.score(world.view(), now).unwrap_or_else(|| {
                if self.scorer.is_empty() {
                    self.flat_score
                } else {
                    self.scorer.evaluate(&world.emotions)
                }
            }),
        };

        if self.running {
            base += world.actions.extra_score_of(self.id);
        }

        let multiplier = if self.running {
            self.started_running_time
                .map_or(1.0, |start| self.running_penalty.evaluate(now.secs_since(start)))
        } else {
            match self.last_run_time {
                Some(last) if now >= self.repetition_penalty_applies_at => {
                    self.repetition_penalty.evaluate(now.secs_since(last))
                }
                _ => 1.0,
            }
        };

        let score = base * multiplier;
        if score.is_finite() && score > 0.0 { score } else { 0.0 }
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Start a fresh activation.
    ///
    /// # Panics
    ///
    /// If the behavior is already running: a second `init` without an
    /// intervening `stop` is a driver bug.
    pub fn init(&mut self, world: &mut World, now: Timestamp) -> Result<(), BehaviorFail> {
        self.limited_resumes = 0;
        self.start(world, now, false)
    }

    /// Re-enter after a short interruption with `is_resuming = true`.
    ///
    /// When `limited` is set (the interrupting reaction is `ResumeLimited`)
    /// the resume counts toward [`MAX_LIMITED_RESUMES`]; reaching the limit
    /// refuses the resume and makes the behavior non-runnable for
    /// [`RESUME_COOLDOWN_MS`].
    ///
    /// # Panics
    ///
    /// If the behavior is already running.
    pub fn resume(
        &mut self,
        world:   &mut World,
        now:     Timestamp,
        limited: bool,
    ) -> Result<(), BehaviorFail> {
        if limited {
            self.limited_resumes += 1;
            if self.limited_resumes >= MAX_LIMITED_RESUMES {
                self.runnable_after = now.offset_millis(RESUME_COOLDOWN_MS);
                warn!(
                    behavior = %self.name,
                    resumes  = self.limited_resumes,
                    until    = %self.runnable_after,
                    "too many resumes; cooling down"
                );
                return Err(BehaviorFail::new("resume limit reached"));
            }
        }
        self.start(world, now, true)
    }

    fn start(&mut self, world: &mut World, now: Timestamp, is_resuming: bool) -> Result<(), BehaviorFail> {
        assert!(
            !self.running,
            "init called on behavior {:?} while it is already running",
            self.name
        );
        let result = self.body.init(world.view_mut(self.id), now, is_resuming);
        self.sync_state_name();
        match result {
            Ok(()) => {
                self.running = true;
                self.started_running_time = Some(now);
                self.activations += 1;
                info!(behavior = %self.name, resuming = is_resuming, %now, "behavior started");
                Ok(())
            }
            Err(fail) => {
                self.runnable_after = now.offset_millis(INIT_FAILURE_BACKOFF_MS);
                world.actions.cancel_owned_by(self.id);
                warn!(behavior = %self.name, reason = %fail, "behavior failed to init");
                Err(fail)
            }
        }
    }

    /// Advance one tick.  Calling this on an idle behavior is a driver bug
    /// reported as [`ContractViolation::UpdateWhileNotRunning`].
    pub fn update(&mut self, world: &mut World, now: Timestamp) -> Result<Status, ContractViolation> {
        if !self.running {
            return Err(ContractViolation::UpdateWhileNotRunning(self.name.clone()));
        }
        let status = self.body.update(world.view_mut(self.id), now);
        self.sync_state_name();
        Ok(status)
    }

    /// Ask the running behavior to wind down.  Advisory and repeatable; on an
    /// idle behavior it is a no-op that succeeds.
    pub fn interrupt(
        &mut self,
        world:    &mut World,
        now:      Timestamp,
        is_short: bool,
    ) -> Result<(), BehaviorFail> {
        if !self.running {
            debug!(behavior = %self.name, "interrupt on idle behavior ignored");
            return Ok(());
        }
        let result = self.body.interrupt(world.view_mut(self.id), now, is_short);
        self.sync_state_name();
        match &result {
            Ok(())    => debug!(behavior = %self.name, short = is_short, "behavior interrupted"),
            Err(fail) => debug!(behavior = %self.name, reason = %fail, "behavior refused interrupt"),
        }
        result
    }

    /// Unconditional teardown.  Idempotent; records `last_run_time` only
    /// when it actually stops a running behavior.  Cancels any actions the
    /// behavior still owns.
    pub fn stop(&mut self, world: &mut World, now: Timestamp) {
        if self.running {
            self.body.stop(world.view_mut(self.id), now);
            self.running = false;
            self.last_run_time = Some(now);
            self.started_running_time = None;
            self.sync_state_name();
            info!(behavior = %self.name, %now, "behavior stopped");
        }
        world.actions.cancel_owned_by(self.id);
    }

    /// Stop, then skip the repetition penalty for [`REPETITION_GRACE_MS`] so
    /// the behavior can be picked again straight away.
    pub fn stop_without_immediate_repetition_penalty(&mut self, world: &mut World, now: Timestamp) {
        self.stop(world, now);
        self.repetition_penalty_applies_at = now.offset_millis(REPETITION_GRACE_MS);
    }

    // ── Events ────────────────────────────────────────────────────────────

    /// Deliver one event.
    ///
    /// Objective achievements are checked against the objective cooldown
    /// regardless of subscription.  Subscribed events go to
    /// `on_event_always` first, then to the running or not-running handler.
    pub fn handle_event(&mut self, event: &Event, world: &mut World, now: Timestamp) {
        if let (Some(objective), Some(cooldown)) = (event.as_objective(), self.objective_cooldown) {
            if objective == cooldown {
                debug!(behavior = %self.name, %objective, "objective achieved; sharing cooldown");
                self.last_run_time = Some(now);
            }
        }

        if !self.is_subscribed(event.tag) {
            return;
        }
        self.body.on_event_always(event, world.view());
        if self.running {
            self.body.on_event_while_running(event, world.view_mut(self.id));
        } else {
            self.body.on_event_while_not_running(event, world.view());
        }
        self.sync_state_name();
    }

    /// Route an action completion back to the behavior that issued it.
    /// Dropped if the behavior is no longer running.
    pub fn handle_action_completed(&mut self, completion: ActionCompletion, world: &mut World) {
        if !self.running {
            debug!(behavior = %self.name, tag = %completion.tag, "completion for idle behavior dropped");
            return;
        }
        self.body.on_action_completed(completion, world.view_mut(self.id));
        self.sync_state_name();
    }

    fn sync_state_name(&mut self) {
        let current = self.body.state_name();
        if self.state_name != current {
            self.state_name.clear();
            self.state_name.push_str(current);
        }
    }
}

impl std::fmt::Debug for BehaviorSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BehaviorSlot")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("state", &self.state_name)
            .field("running", &self.running)
            .field("last_run_time", &self.last_run_time)
            .finish()
    }
}
