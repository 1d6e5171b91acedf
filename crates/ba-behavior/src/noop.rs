//! A behavior that does nothing, forever.

use ba_core::Timestamp;

use crate::{Behavior, BehaviorFail, Status, WorldView, WorldViewMut};

/// Always runnable, never finishes, never acts.
///
/// The fallback of `ExplicitSelectionChooser` and a convenient placeholder in
/// tests.  Registered in every [`BehaviorFactory`][crate::BehaviorFactory]
/// under [`NoopBehavior::KIND`].
#[derive(Debug, Default)]
pub struct NoopBehavior;

impl NoopBehavior {
    pub const KIND: &'static str = "NoOp";
}

impl Behavior for NoopBehavior {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn is_runnable(&self, _world: WorldView<'_>, _now: Timestamp) -> bool {
        true
    }

    fn init(&mut self, _world: WorldViewMut<'_>, _now: Timestamp, _resuming: bool) -> Result<(), BehaviorFail> {
        Ok(())
    }

    fn update(&mut self, _world: WorldViewMut<'_>, _now: Timestamp) -> Status {
        Status::Running
    }
}
