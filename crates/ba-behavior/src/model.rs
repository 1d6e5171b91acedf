//! The `Behavior` trait — the extension point for behavior authors.

use std::any::Any;

use ba_core::Timestamp;

use crate::{ActionCompletion, BehaviorFail, Event, EventTag, WorldView, WorldViewMut};

/// Result of one `update` call.
///
/// `Failure` and `Complete` both end the activation; they differ only in what
/// gets logged and whether a short-interruption resume is honoured.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Status {
    Failure,
    Running,
    Complete,
}

/// Downcasting support for boxed bodies.  Blanket-implemented; never
/// implement it by hand.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A behavior body: the domain logic of one unit of autonomous activity.
///
/// Bodies are wrapped in a [`BehaviorSlot`][crate::BehaviorSlot] by the
/// [`BehaviorFactory`][crate::BehaviorFactory] and never driven directly.  The
/// slot owns the running flag and timestamps and only forwards calls that
/// are legal in the current lifecycle state, so a body may assume:
///
/// * `init` is called only while not running;
/// * `update`, `interrupt` and `on_action_completed` only while running;
/// * `stop` once per successful `init`.
///
/// # Required methods
///
/// [`kind`][Self::kind], [`is_runnable`][Self::is_runnable],
/// [`init`][Self::init] and [`update`][Self::update].  Everything else has a
/// sensible default.
///
/// # Threading
///
/// The arbitration engine is single-threaded, so bodies need not be `Send`.
///
/// # Example
///
/// ```rust,ignore
/// struct LookAround { turns: u32 }
///
/// impl Behavior for LookAround {
///     fn kind(&self) -> &str { "LookAround" }
///
///     fn is_runnable(&self, _world: WorldView<'_>, _now: Timestamp) -> bool { true }
///
///     fn init(&mut self, mut world: WorldViewMut<'_>, _now: Timestamp, _resuming: bool)
///         -> Result<(), BehaviorFail>
///     {
///         self.turns = 0;
///         world.start_action(QueueSlot::DEFAULT, "turn_in_place", vec![]);
///         Ok(())
///     }
///
///     fn update(&mut self, _world: WorldViewMut<'_>, _now: Timestamp) -> Status {
///         if self.turns >= 4 { Status::Complete } else { Status::Running }
///     }
/// }
/// ```
pub trait Behavior: AsAny {
    /// Stable kind name; the slot's default display name.
    fn kind(&self) -> &str;

    /// Can this behavior start now?  Must not mutate anything.
    fn is_runnable(&self, world: WorldView<'_>, now: Timestamp) -> bool;

    /// Can this behavior keep going?  Queried instead of `is_runnable` while
    /// the behavior holds control.  Defaults to `is_runnable`.
    fn is_runnable_while_running(&self, world: WorldView<'_>, now: Timestamp) -> bool {
        self.is_runnable(world, now)
    }

    /// Update cached targets before the read-only queries of a tick.
    fn refresh(&mut self, _world: WorldView<'_>, _now: Timestamp) {}

    /// Start an activation.  `is_resuming` is `true` when re-entered after a
    /// short interruption, so setup already done may be skipped.
    fn init(
        &mut self,
        world:       WorldViewMut<'_>,
        now:         Timestamp,
        is_resuming: bool,
    ) -> Result<(), BehaviorFail>;

    /// Advance one tick.
    fn update(&mut self, world: WorldViewMut<'_>, now: Timestamp) -> Status;

    /// Reach a safe state as fast as possible.  `Err` means "not now"; the
    /// caller will ask again.  Default: always accept.
    fn interrupt(
        &mut self,
        _world:    WorldViewMut<'_>,
        _now:      Timestamp,
        _is_short: bool,
    ) -> Result<(), BehaviorFail> {
        Ok(())
    }

    /// Tear down.  Outstanding actions are cancelled by the slot afterwards.
    fn stop(&mut self, _world: WorldViewMut<'_>, _now: Timestamp) {}

    /// Replace the emotion scorer for this evaluation.  `None` defers to the
    /// configured scorer.
    fn score(&self, _world: WorldView<'_>, _now: Timestamp) -> Option<f32> {
        None
    }

    /// Event tags this body wants delivered.  Read once at construction.
    fn subscriptions(&self) -> &[EventTag] {
        &[]
    }

    /// Called for every subscribed event, before the running/not-running
    /// handler.
    fn on_event_always(&mut self, _event: &Event, _world: WorldView<'_>) {}

    fn on_event_while_running(&mut self, _event: &Event, _world: WorldViewMut<'_>) {}

    fn on_event_while_not_running(&mut self, _event: &Event, _world: WorldView<'_>) {}

    /// Completion of an action this behavior started, delivered while it is
    /// still running.  No subscription needed.
    fn on_action_completed(&mut self, _completion: ActionCompletion, _world: WorldViewMut<'_>) {}

    /// Diagnostic sub-state label.
    fn state_name(&self) -> &str {
        ""
    }
}
