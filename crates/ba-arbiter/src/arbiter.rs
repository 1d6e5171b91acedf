//! The `Arbiter` struct and its tick loop.

use std::collections::VecDeque;

use ba_behavior::{BehaviorSlot, Event, Status, World};
use ba_chooser::{BehaviorChooser, ChooserCommand, Reaction, ResumeTarget};
use ba_core::{ArbiterClock, ArbiterConfig, ArbiterRng, BehaviorId, EscalationPolicy, Timestamp};
use tracing::{debug, info, warn};

use crate::{ArbiterObserver, ArbiterResult, StopReason};

/// Single-writer driver of behavior lifecycles.
///
/// `Arbiter` owns the world, the current chooser and the event queue, and is
/// the only caller of `init` / `update` / `interrupt` / `stop`.  At most one
/// behavior is running at any time.
///
/// Each [`tick`][Self::tick]:
///
/// 1. **Clock**: accept `now` (a regressing value is clamped).
/// 2. **Refresh**: every behavior of the chooser refreshes cached state.
/// 3. **Events**: queued events are delivered in arrival order.  Action
///    completions go to the issuing behavior first, then every behavior sees
///    the event (always-handler, then running / not-running handler), then
///    the chooser may answer with a reaction, which takes over immediately.
/// 4. **Retry**: a reaction from an earlier tick whose interrupt was refused
///    is attempted again.
/// 5. **Decide**: unless a reaction is waiting, the chooser's decision is
///    applied; a different decision hands control over.
/// 6. **Update**: the active behavior runs one step.  On `Complete` or
///    `Failure` it is stopped and, after a short reaction, the behavior it
///    displaced is resumed.
///
/// Create via [`ArbiterBuilder`][crate::ArbiterBuilder].
pub struct Arbiter {
    pub(crate) config:        ArbiterConfig,
    pub(crate) clock:         ArbiterClock,
    pub(crate) world:         World,
    pub(crate) chooser:       Box<dyn BehaviorChooser>,
    pub(crate) observer:      Box<dyn ArbiterObserver>,
    pub(crate) rng:           ArbiterRng,
    /// Children handed out by [`chooser_rng`][Self::chooser_rng] so far.
    pub(crate) rng_children:  u64,
    pub(crate) active:        Option<BehaviorId>,
    /// A reaction that could not take over yet (interrupt refused).
    pub(crate) pending:       Option<Reaction>,
    pub(crate) events:        VecDeque<Event>,
    pub(crate) chooser_since: Timestamp,
}

impl Arbiter {
    // ── Public API ────────────────────────────────────────────────────────

    /// Queue an event for delivery on the next tick.
    pub fn post_event(&mut self, event: Event) {
        self.events.push_back(event);
    }

    /// Run one arbitration tick at `now` and return the behavior holding
    /// control afterwards.
    ///
    /// The only error is a lifecycle contract violation, which means the
    /// arbiter lost track of the running behavior; control is released.
    pub fn tick(&mut self, now: Timestamp) -> ArbiterResult<Option<BehaviorId>> {
        let now = self.clock.advance_to(now);
        self.observer.on_tick_start(now);

        self.chooser.refresh(&self.world, now);

        let fired = self.deliver_events(now);
        if !fired {
            self.retry_pending(now);
        }

        if self.pending.is_none() {
            let decision = self.chooser.tick(&self.world, now, self.active);
            if decision != self.active {
                self.hand_over(decision, None, now);
            }
        }

        self.update_active(now)?;

        self.world.emotions.end_tick();
        debug_assert!(
            self.chooser.arena().iter().filter(|s| s.is_running()).count()
                == usize::from(self.active.is_some()),
            "single-active invariant violated"
        );
        let active = self.active.and_then(|id| self.chooser.arena().get(id));
        self.observer.on_tick_end(now, active);
        Ok(self.active)
    }

    /// Ask the chooser to make `name` the explicit selection.  Returns
    /// `false` (and warns) if the chooser does not support selection or does
    /// not know the name.
    pub fn select_behavior_by_name(&mut self, name: &str) -> bool {
        self.send_command(ChooserCommand::SelectBehaviorByName(name.to_string()))
    }

    /// Forward an out-of-band command to the current chooser.
    pub fn send_command(&mut self, command: ChooserCommand) -> bool {
        let handled = self.chooser.handle_command(&command);
        if !handled {
            warn!(chooser = %self.chooser.name(), ?command, "command not handled");
        }
        handled
    }

    /// Switch robot mode.
    ///
    /// The active behavior is stopped, the outgoing chooser stops everything
    /// it owns, and the switch time is recorded.  The outgoing chooser is
    /// returned so the caller can switch back to it later.
    pub fn set_chooser(&mut self, chooser: Box<dyn BehaviorChooser>) -> Box<dyn BehaviorChooser> {
        let now = self.clock.now();
        if let Some(id) = self.active.take() {
            if let Some(slot) = self.chooser.arena_mut().get_mut(id) {
                slot.stop(&mut self.world, now);
                self.observer.on_behavior_stopped(slot, StopReason::ModeSwitch, now);
            }
        }
        self.pending = None;

        let mut previous = std::mem::replace(&mut self.chooser, chooser);
        previous.shutdown(&mut self.world, now);
        self.chooser_since = now;
        info!(from = %previous.name(), to = %self.chooser.name(), %now, "chooser switched");
        previous
    }

    /// Stop the active behavior and everything the chooser owns.  The
    /// arbiter stays usable; the next tick picks a behavior afresh.
    pub fn shutdown(&mut self) {
        let now = self.clock.now();
        if let Some(id) = self.active.take() {
            if let Some(slot) = self.chooser.arena_mut().get_mut(id) {
                slot.stop(&mut self.world, now);
                self.observer.on_behavior_stopped(slot, StopReason::Preempted, now);
            }
        }
        self.pending = None;
        self.chooser.shutdown(&mut self.world, now);
    }

    /// A fresh tie-breaking RNG for a chooser built after construction.
    pub fn chooser_rng(&mut self) -> ArbiterRng {
        self.rng_children += 1;
        self.rng.child(self.rng_children)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn clock(&self) -> &ArbiterClock {
        &self.clock
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for the application (emotions, facts).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn chooser(&self) -> &dyn BehaviorChooser {
        self.chooser.as_ref()
    }

    pub fn chooser_mut(&mut self) -> &mut dyn BehaviorChooser {
        self.chooser.as_mut()
    }

    /// When the current chooser took over.
    pub fn chooser_since(&self) -> Timestamp {
        self.chooser_since
    }

    pub fn active(&self) -> Option<BehaviorId> {
        self.active
    }

    pub fn active_slot(&self) -> Option<&BehaviorSlot> {
        self.active.and_then(|id| self.chooser.arena().get(id))
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active_slot().map(BehaviorSlot::name)
    }

    /// The reaction waiting for the active behavior to accept an interrupt.
    pub fn pending_reaction(&self) -> Option<Reaction> {
        self.pending
    }

    /// Events queued for the next tick.
    pub fn queued_events(&self) -> usize {
        self.events.len()
    }

    // ── Events ────────────────────────────────────────────────────────────

    /// Deliver queued events.  Returns `true` if any of them fired a
    /// reaction.
    fn deliver_events(&mut self, now: Timestamp) -> bool {
        let budget = match self.config.max_events_per_tick {
            0 => usize::MAX,
            n => n,
        };
        let mut fired = false;
        let mut delivered = 0;
        while delivered < budget {
            let Some(event) = self.events.pop_front() else { break };
            delivered += 1;
            self.route_event(&event, now);

            if let Some(reaction) = self.chooser.react(&event, &self.world, now, self.active) {
                if let Some(slot) = self.chooser.arena().get(reaction.behavior) {
                    self.observer.on_reaction(slot, &event, now);
                }
                fired = true;
                self.pending = Some(reaction);
                self.retry_pending(now);
            }
        }
        if !self.events.is_empty() {
            debug!(deferred = self.events.len(), "event budget exhausted; deferring to next tick");
        }
        fired
    }

    fn route_event(&mut self, event: &Event, now: Timestamp) {
        if let Some(completion) = event.as_action_completion() {
            match self.world.actions.finish(completion.tag) {
                Some(action) => {
                    if let Some(slot) = self.chooser.arena_mut().get_mut(action.owner) {
                        slot.handle_action_completed(completion, &mut self.world);
                    }
                }
                None => debug!(tag = %completion.tag, "completion for unknown or cancelled action"),
            }
        }
        for slot in self.chooser.arena_mut().iter_mut() {
            slot.handle_event(event, &mut self.world, now);
        }
    }

    // ── Handover ──────────────────────────────────────────────────────────

    /// Try to let the pending reaction take over.
    fn retry_pending(&mut self, now: Timestamp) {
        let Some(reaction) = self.pending else { return };
        if self.active == Some(reaction.behavior) {
            self.pending = None;
            return;
        }
        let runnable = self
            .chooser
            .arena()
            .get(reaction.behavior)
            .is_some_and(|s| s.is_runnable(&self.world, now));
        if !runnable {
            debug!(behavior = %reaction.behavior, "pending reaction no longer runnable; dropped");
            self.pending = None;
            return;
        }
        if self.hand_over(Some(reaction.behavior), Some(reaction), now) {
            self.pending = None;
        }
    }

    /// Release the active behavior and start `target`.  Returns `false` if
    /// the active behavior refused to let go.
    fn hand_over(&mut self, target: Option<BehaviorId>, cause: Option<Reaction>, now: Timestamp) -> bool {
        if let Some(current) = self.active {
            if !self.release(current, cause, now) {
                return false;
            }
        }
        if let Some(id) = target {
            self.start(id, None, now);
        }
        true
    }

    fn escalates(&self, cause: Option<Reaction>) -> bool {
        match self.config.escalation {
            EscalationPolicy::Never            => false,
            EscalationPolicy::HardTriggersOnly => cause.is_some_and(|r| r.hard),
            EscalationPolicy::Always           => true,
        }
    }

    /// Interrupt (if configured) and stop `current`.
    fn release(&mut self, current: BehaviorId, cause: Option<Reaction>, now: Timestamp) -> bool {
        let escalate = self.escalates(cause);
        let is_short = cause.is_some_and(|r| r.short);
        let Some(slot) = self.chooser.arena_mut().get_mut(current) else {
            self.active = None;
            return true;
        };

        let mut reason = StopReason::Preempted;
        if self.config.interrupt_before_stop {
            if let Err(fail) = slot.interrupt(&mut self.world, now, is_short) {
                if !escalate {
                    warn!(behavior = %slot.name(), reason = %fail, "interrupt refused; retrying next tick");
                    self.observer.on_interrupt_refused(slot, now);
                    return false;
                }
                warn!(behavior = %slot.name(), reason = %fail, "interrupt refused; forcing stop");
                reason = StopReason::Forced;
            }
        }
        slot.stop(&mut self.world, now);
        self.observer.on_behavior_stopped(slot, reason, now);
        self.active = None;
        true
    }

    /// `init` (or resume, when `resume` is set) behavior `id`.  On failure
    /// the arbiter stays idle; the slot has already applied its back-off.
    fn start(&mut self, id: BehaviorId, resume: Option<ResumeTarget>, now: Timestamp) {
        let Some(slot) = self.chooser.arena_mut().get_mut(id) else {
            warn!(behavior = %id, "decision names a behavior the chooser does not own");
            return;
        };
        let result = match resume {
            Some(target) => slot.resume(&mut self.world, now, target.limited),
            None => slot.init(&mut self.world, now),
        };
        if result.is_ok() {
            self.active = Some(id);
            self.observer.on_behavior_started(slot, resume.is_some(), now);
        }
    }

    // ── Update ────────────────────────────────────────────────────────────

    fn update_active(&mut self, now: Timestamp) -> ArbiterResult<()> {
        let Some(id) = self.active else { return Ok(()) };
        let Some(slot) = self.chooser.arena_mut().get_mut(id) else {
            self.active = None;
            return Ok(());
        };

        let status = match slot.update(&mut self.world, now) {
            Ok(status) => status,
            Err(violation) => {
                self.active = None;
                return Err(violation.into());
            }
        };
        if status == Status::Running {
            return Ok(());
        }

        let reason = if status == Status::Complete { StopReason::Completed } else { StopReason::Failed };
        debug!(behavior = %slot.name(), ?status, "behavior finished");
        slot.stop(&mut self.world, now);
        self.observer.on_behavior_stopped(slot, reason, now);
        self.active = None;

        if let Some(target) = self.chooser.take_resume_target(id, status == Status::Complete) {
            let runnable = self
                .chooser
                .arena()
                .get(target.behavior)
                .is_some_and(|s| s.is_runnable(&self.world, now));
            if runnable {
                self.start(target.behavior, Some(target), now);
            } else {
                debug!(behavior = %target.behavior, "resume target not runnable; skipped");
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Arbiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arbiter")
            .field("clock", &self.clock)
            .field("chooser", &self.chooser.name())
            .field("active", &self.active)
            .field("pending", &self.pending)
            .field("queued_events", &self.events.len())
            .finish()
    }
}
