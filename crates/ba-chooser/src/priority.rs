//! First runnable behavior in insertion order.

use ba_behavior::{BehaviorArena, BehaviorSlot, World};
use ba_core::{BehaviorId, Timestamp};

use crate::{BehaviorChooser, ChooserResult, Decision};

/// Insertion order is priority.  No scoring is consulted; O(n) per tick.
#[derive(Debug)]
pub struct PriorityListChooser {
    name:  String,
    arena: BehaviorArena,
}

impl PriorityListChooser {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), arena: BehaviorArena::new() }
    }
}

impl BehaviorChooser for PriorityListChooser {
    fn name(&self) -> &str {
        &self.name
    }

    fn add(&mut self, slot: BehaviorSlot) -> ChooserResult<BehaviorId> {
        Ok(self.arena.insert(slot)?)
    }

    fn arena(&self) -> &BehaviorArena {
        &self.arena
    }

    fn arena_mut(&mut self) -> &mut BehaviorArena {
        &mut self.arena
    }

    fn tick(&mut self, world: &World, now: Timestamp, _active: Option<BehaviorId>) -> Decision {
        self.arena.iter().find(|s| s.is_runnable(world, now)).map(BehaviorSlot::id)
    }
}
