//! Arbiter observer trait for tracing decisions and collecting statistics.

use ba_behavior::{BehaviorSlot, Event};
use ba_core::Timestamp;

/// Why a behavior left the running state.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum StopReason {
    /// `update` returned `Complete`.
    Completed,
    /// `update` returned `Failure`.
    Failed,
    /// Handed over to another behavior (or to nothing).
    Preempted,
    /// The behavior refused an interrupt and the escalation policy stopped it
    /// anyway.
    Forced,
    /// The chooser was replaced.
    ModeSwitch,
}

/// Callbacks invoked by [`Arbiter::tick`][crate::Arbiter::tick] at key points
/// of the arbitration loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — activity printer
///
/// ```rust,ignore
/// struct Printer;
///
/// impl ArbiterObserver for Printer {
///     fn on_behavior_started(&mut self, slot: &BehaviorSlot, resuming: bool, now: Timestamp) {
///         println!("{now}: {} started (resuming: {resuming})", slot.name());
///     }
/// }
/// ```
pub trait ArbiterObserver {
    /// Called at the very start of each tick, after the clock accepted `now`.
    fn on_tick_start(&mut self, _now: Timestamp) {}

    /// Called at the end of each tick with the behavior holding control.
    fn on_tick_end(&mut self, _now: Timestamp, _active: Option<&BehaviorSlot>) {}

    /// A behavior completed `init` (or a resume) successfully.
    fn on_behavior_started(&mut self, _slot: &BehaviorSlot, _resuming: bool, _now: Timestamp) {}

    /// A running behavior was stopped.
    fn on_behavior_stopped(&mut self, _slot: &BehaviorSlot, _reason: StopReason, _now: Timestamp) {}

    /// The active behavior refused an interrupt and keeps control for now.
    fn on_interrupt_refused(&mut self, _slot: &BehaviorSlot, _now: Timestamp) {}

    /// An event triggered a reaction.
    fn on_reaction(&mut self, _reaction: &BehaviorSlot, _event: &Event, _now: Timestamp) {}
}

/// An [`ArbiterObserver`] that does nothing.
pub struct NoopObserver;

impl ArbiterObserver for NoopObserver {}
