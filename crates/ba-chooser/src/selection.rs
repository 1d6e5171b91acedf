//! Externally selected behavior with a no-op fallback.
//!
//! Used for manual and diagnostic override: a `SelectBehaviorByName` command
//! picks the behavior, and the chooser returns it while it is runnable (or
//! already running).  Otherwise the built-in no-op behavior holds control.

use ba_behavior::{BehaviorArena, BehaviorFactory, BehaviorSlot, NoopBehavior, World};
use ba_core::{BehaviorId, Timestamp};
use tracing::{info, warn};

use crate::{BehaviorChooser, ChooserCommand, ChooserResult, Decision};

#[derive(Debug)]
pub struct ExplicitSelectionChooser {
    name:     String,
    arena:    BehaviorArena,
    fallback: BehaviorId,
    selected: Option<BehaviorId>,
}

impl ExplicitSelectionChooser {
    /// Build the chooser and its fallback through `factory`.
    pub fn new(name: impl Into<String>, factory: &BehaviorFactory) -> ChooserResult<Self> {
        let mut arena = BehaviorArena::new();
        let fallback = arena.insert(factory.create_noop(NoopBehavior::KIND))?;
        Ok(Self { name: name.into(), arena, fallback, selected: None })
    }

    /// Select `name`.  Unknown names are ignored with a warning and leave the
    /// current selection in place.  Returns whether the selection changed.
    pub fn select_by_name(&mut self, name: &str) -> bool {
        match self.arena.id_of(name) {
            Some(id) => {
                info!(chooser = %self.name, behavior = %name, "behavior selected");
                self.selected = Some(id);
                true
            }
            None => {
                warn!(chooser = %self.name, behavior = %name, "cannot select unknown behavior");
                false
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<BehaviorId> {
        self.selected
    }

    pub fn fallback(&self) -> BehaviorId {
        self.fallback
    }
}

impl BehaviorChooser for ExplicitSelectionChooser {
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
        let chosen = self.selected.filter(|&id| {
            self.arena
                .get(id)
                .is_some_and(|s| s.is_running() || s.is_runnable(world, now))
        });
        Some(chosen.unwrap_or(self.fallback))
    }

    fn handle_command(&mut self, command: &ChooserCommand) -> bool {
        match command {
            ChooserCommand::SelectBehaviorByName(name) => self.select_by_name(name),
            _ => false,
        }
    }
}
