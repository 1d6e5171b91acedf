//! Insertion-ordered owner of behavior slots.
//!
//! Choosers hold their behaviors in a `BehaviorArena` and refer to them by
//! [`BehaviorId`] handles.  Insertion order is significant: it is the
//! priority order of `PriorityListChooser` and the iteration order used for
//! scoring and reaction matching.

use ba_core::{BehaviorId, Timestamp};
use tracing::warn;

use crate::{BehaviorError, BehaviorResult, BehaviorSlot, NameMap, World};

#[derive(Debug, Default)]
pub struct BehaviorArena {
    slots:   Vec<BehaviorSlot>,
    by_name: NameMap<BehaviorId>,
}

impl BehaviorArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `slot` and return its handle.  Names must be unique
    /// within one arena.
    pub fn insert(&mut self, mut slot: BehaviorSlot) -> BehaviorResult<BehaviorId> {
        if self.by_name.contains_key(slot.name()) {
            return Err(BehaviorError::DuplicateName(slot.name().to_string()));
        }
        let id = BehaviorId::try_from(self.slots.len())
            .map_err(|_| BehaviorError::Config("behavior arena is full".into()))?;
        slot.set_id(id);
        self.by_name.insert(slot.name().to_string(), id);
        self.slots.push(slot);
        Ok(id)
    }

    #[inline]
    pub fn get(&self, id: BehaviorId) -> Option<&BehaviorSlot> {
        self.slots.get(id.index())
    }

    #[inline]
    pub fn get_mut(&mut self, id: BehaviorId) -> Option<&mut BehaviorSlot> {
        self.slots.get_mut(id.index())
    }

    pub fn id_of(&self, name: &str) -> Option<BehaviorId> {
        self.by_name.get(name).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<&BehaviorSlot> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    /// Slots in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, BehaviorSlot> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, BehaviorSlot> {
        self.slots.iter_mut()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Handle of the running slot, if any.
    pub fn running(&self) -> Option<BehaviorId> {
        self.slots.iter().find(|s| s.is_running()).map(BehaviorSlot::id)
    }

    /// Stop every slot.  Called before the arena is dropped.
    pub fn stop_all(&mut self, world: &mut World, now: Timestamp) {
        for slot in &mut self.slots {
            slot.stop(world, now);
        }
    }
}

impl Drop for BehaviorArena {
    fn drop(&mut self) {
        for slot in self.slots.iter().filter(|s| s.is_running()) {
            warn!(behavior = %slot.name(), "behavior dropped while still running");
        }
    }
}
