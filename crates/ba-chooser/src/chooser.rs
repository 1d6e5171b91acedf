//! The `BehaviorChooser` trait.

use ba_behavior::{BehaviorArena, BehaviorSlot, Event, World};
use ba_core::{BehaviorId, Timestamp};

use crate::ChooserResult;

/// Per-tick output of a chooser: the behavior that should hold control, or
/// `None` for "nothing to do".
pub type Decision = Option<BehaviorId>;

/// An event-triggered preemption request.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Reaction {
    pub behavior: BehaviorId,
    /// The reaction is in the `HardInterrupt` group: a refused interrupt may
    /// be escalated to a forced stop.
    pub hard:     bool,
    /// The reaction is in the `ShortInterruption` group.
    pub short:    bool,
}

/// A behavior to re-enter with `is_resuming = true` after a short
/// interruption completes.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ResumeTarget {
    pub behavior: BehaviorId,
    /// The resume counts toward the behavior's resume limit.
    pub limited:  bool,
}

/// Out-of-band commands a chooser may understand.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ChooserCommand {
    SelectBehaviorByName(String),
    DisableReaction { lock: String, behavior: String },
    EnableReaction { lock: String, behavior: String },
}

/// Selection policy for one robot mode.
///
/// # Contract
///
/// * `tick`, `react` and the queries never change lifecycle state; they only
///   read slots.  The arbiter is the sole driver of `init`/`update`/`stop`.
/// * `active` is the behavior currently holding control, if it belongs to
///   this chooser.
/// * Before the chooser is dropped, [`shutdown`][Self::shutdown] stops every
///   behavior it owns.
pub trait BehaviorChooser {
    fn name(&self) -> &str;

    /// Take ownership of a behavior.
    fn add(&mut self, slot: BehaviorSlot) -> ChooserResult<BehaviorId>;

    fn arena(&self) -> &BehaviorArena;

    fn arena_mut(&mut self) -> &mut BehaviorArena;

    fn get_by_name(&self, name: &str) -> Option<&BehaviorSlot> {
        self.arena().get_by_name(name)
    }

    fn id_of(&self, name: &str) -> Option<BehaviorId> {
        self.arena().id_of(name)
    }

    /// Which behavior should hold control now.
    fn tick(&mut self, world: &World, now: Timestamp, active: Option<BehaviorId>) -> Decision;

    /// Immediate preemption check for one incoming event, run before scoring.
    fn react(
        &mut self,
        _event:  &Event,
        _world:  &World,
        _now:    Timestamp,
        _active: Option<BehaviorId>,
    ) -> Option<Reaction> {
        None
    }

    /// Called when `finished` ended by itself.  Returns the behavior to
    /// resume, if any; the chooser forgets it either way.
    fn take_resume_target(&mut self, _finished: BehaviorId, _completed_normally: bool) -> Option<ResumeTarget> {
        None
    }

    /// Apply an out-of-band command.  Returns `false` if this chooser does
    /// not understand it or could not act on it.
    fn handle_command(&mut self, _command: &ChooserCommand) -> bool {
        false
    }

    /// Let every behavior refresh cached state before this tick's queries.
    fn refresh(&mut self, world: &World, now: Timestamp) {
        for slot in self.arena_mut().iter_mut() {
            slot.refresh(world, now);
        }
    }

    /// Stop every owned behavior.
    fn shutdown(&mut self, world: &mut World, now: Timestamp) {
        self.arena_mut().stop_all(world, now);
    }
}
