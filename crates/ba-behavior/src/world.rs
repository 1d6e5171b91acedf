//! World state shared by every behavior, and the two views onto it.

use ba_core::{ActionTag, BehaviorId, EmotionState};

use crate::{ActionQueue, Blackboard, QueueSlot};

/// Everything a behavior can observe or act on.
///
/// Owned by the arbiter.  Behaviors only ever see it through a [`WorldView`]
/// or, while they hold control, a [`WorldViewMut`].
#[derive(Debug, Default)]
pub struct World {
    pub emotions: EmotionState,
    pub actions:  ActionQueue,
    pub facts:    Blackboard,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn view(&self) -> WorldView<'_> {
        WorldView { world: self }
    }

    /// Mutable view on behalf of `owner`; actions started through it are
    /// attributed to `owner`.
    #[inline]
    pub fn view_mut(&mut self, owner: BehaviorId) -> WorldViewMut<'_> {
        WorldViewMut { world: self, owner }
    }
}

// ── WorldView ─────────────────────────────────────────────────────────────────

/// Read-only snapshot passed to queries and passive event handlers.
#[derive(Copy, Clone)]
pub struct WorldView<'a> {
    world: &'a World,
}

impl<'a> WorldView<'a> {
    #[inline]
    pub fn emotions(&self) -> &'a EmotionState {
        &self.world.emotions
    }

    #[inline]
    pub fn actions(&self) -> &'a ActionQueue {
        &self.world.actions
    }

    #[inline]
    pub fn facts(&self) -> &'a Blackboard {
        &self.world.facts
    }

    /// Shorthand for `facts().get::<T>()`.
    #[inline]
    pub fn fact<T: 'static>(&self) -> Option<&'a T> {
        self.world.facts.get::<T>()
    }
}

// ── WorldViewMut ──────────────────────────────────────────────────────────────

/// Read-write access handed to the behavior that currently holds control.
pub struct WorldViewMut<'a> {
    world: &'a mut World,
    owner: BehaviorId,
}

impl<'a> WorldViewMut<'a> {
    /// The behavior this view acts for.
    #[inline]
    pub fn owner(&self) -> BehaviorId {
        self.owner
    }

    /// Reborrow as a read-only view.
    #[inline]
    pub fn view(&self) -> WorldView<'_> {
        WorldView { world: self.world }
    }

    #[inline]
    pub fn emotions_mut(&mut self) -> &mut EmotionState {
        &mut self.world.emotions
    }

    #[inline]
    pub fn facts_mut(&mut self) -> &mut Blackboard {
        &mut self.world.facts
    }

    /// Enqueue an action attributed to the owning behavior.
    pub fn start_action(
        &mut self,
        slot:    QueueSlot,
        name:    impl Into<String>,
        payload: Vec<u8>,
    ) -> ActionTag {
        self.world.actions.start(self.owner, slot, name, payload)
    }

    /// Enqueue an action whose `extra_score` is added to the owner's running
    /// score until the action completes or is cancelled.
    pub fn start_action_extra_score(
        &mut self,
        slot:        QueueSlot,
        name:        impl Into<String>,
        payload:     Vec<u8>,
        extra_score: f32,
    ) -> ActionTag {
        let tag = self.start_action(slot, name, payload);
        self.increase_score_while_acting(extra_score);
        tag
    }

    /// Raise the running-score bonus of the action most recently started by
    /// the owner.  Repeated calls accumulate.  Returns `false` (and changes
    /// nothing) if the owner is not acting.
    pub fn increase_score_while_acting(&mut self, extra_score: f32) -> bool {
        self.world.actions.increase_extra_score(self.owner, extra_score)
    }

    /// Cancel one of the owning behavior's actions.  Tags owned by another
    /// behavior are left alone and `false` is returned.
    pub fn cancel_action(&mut self, tag: ActionTag) -> bool {
        if self.world.actions.owner_of(tag) != Some(self.owner) {
            return false;
        }
        self.world.actions.cancel(tag).is_some()
    }

    /// `true` if the owning behavior still has actions pending.
    pub fn has_pending_actions(&self) -> bool {
        self.world.actions.pending().iter().any(|a| a.owner == self.owner)
    }
}
