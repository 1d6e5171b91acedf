//! The shared actuator queue.
//!
//! Behaviors never drive motors directly.  They enqueue named actions into a
//! queue slot and get an [`ActionTag`] back; an external executor runs the
//! actions and reports completion as an
//! [`EngineTag::ROBOT_COMPLETED_ACTION`][crate::EngineTag::ROBOT_COMPLETED_ACTION]
//! event carrying the same tag.  The queue remembers which behavior issued
//! each tag so completions can be routed back and so a stopped behavior's
//! leftovers can be cancelled.  Action contents are opaque here.
//!
//! An action may also carry a score bonus for its owner.  While the owner
//! runs with the action in flight the bonus is added to its running score,
//! which makes it harder to displace mid-action.  The bonus leaves with the
//! action.

use ba_core::{ActionTag, BehaviorId};
use tracing::debug;

/// Queue lane an action is placed in.  Lanes are executed independently by
/// the executor (e.g. body motion vs. face animation).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
pub struct QueueSlot(pub u8);

impl QueueSlot {
    pub const DEFAULT: QueueSlot = QueueSlot(0);
}

/// Final outcome of an action as reported by the executor.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ActionResult {
    Success,
    Failure,
    Cancelled,
}

/// One action waiting for (or under) execution.
#[derive(Clone, Debug, PartialEq)]
pub struct QueuedAction {
    pub tag:     ActionTag,
    pub owner:   BehaviorId,
    pub slot:    QueueSlot,
    pub name:    String,
    pub payload: Vec<u8>,
    /// Added to the owner's running score while this action is pending.
    pub extra_score: f32,
}

/// Pending actions in enqueue order, with owner correlation.
#[derive(Debug, Default)]
pub struct ActionQueue {
    next_tag: u32,
    pending:  Vec<QueuedAction>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an action on behalf of `owner` and return its correlation tag.
    pub fn start(
        &mut self,
        owner:   BehaviorId,
        slot:    QueueSlot,
        name:    impl Into<String>,
        payload: Vec<u8>,
    ) -> ActionTag {
        let tag = ActionTag(self.next_tag);
        // INVALID is u32::MAX; skip it on wrap.
        self.next_tag = self.next_tag.wrapping_add(1) % u32::MAX;
        let name = name.into();
        debug!(%tag, %owner, slot = slot.0, action = %name, "action queued");
        self.pending.push(QueuedAction { tag, owner, slot, name, payload, extra_score: 0.0 });
        tag
    }

    /// Add `extra` to the score bonus of `owner`'s most recent pending
    /// action.  Returns `false` if `owner` has nothing in flight.
    pub fn increase_extra_score(&mut self, owner: BehaviorId, extra: f32) -> bool {
        let Some(action) = self.pending.iter_mut().rev().find(|a| a.owner == owner) else {
            return false;
        };
        action.extra_score += extra;
        debug!(tag = %action.tag, %owner, bonus = action.extra_score, "score bonus while acting");
        true
    }

    /// Sum of the score bonuses of `owner`'s pending actions.
    pub fn extra_score_of(&self, owner: BehaviorId) -> f32 {
        self.pending
            .iter()
            .filter(|a| a.owner == owner)
            .map(|a| a.extra_score)
            .sum()
    }

    /// Remove a pending action without reporting completion.
    pub fn cancel(&mut self, tag: ActionTag) -> Option<QueuedAction> {
        let pos = self.pending.iter().position(|a| a.tag == tag)?;
        let action = self.pending.remove(pos);
        debug!(%tag, owner = %action.owner, action = %action.name, "action cancelled");
        Some(action)
    }

    /// Cancel every action issued by `owner`.  Returns how many were removed.
    pub fn cancel_owned_by(&mut self, owner: BehaviorId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|a| a.owner != owner);
        let removed = before - self.pending.len();
        if removed > 0 {
            debug!(%owner, removed, "cancelled actions owned by stopping behavior");
        }
        removed
    }

    /// Retire a completed action and return it (with its owner).
    ///
    /// `None` means the tag is unknown, typically because the owner was
    /// stopped and its actions cancelled before the completion arrived.
    pub fn finish(&mut self, tag: ActionTag) -> Option<QueuedAction> {
        let pos = self.pending.iter().position(|a| a.tag == tag)?;
        Some(self.pending.remove(pos))
    }

    pub fn owner_of(&self, tag: ActionTag) -> Option<BehaviorId> {
        self.pending.iter().find(|a| a.tag == tag).map(|a| a.owner)
    }

    /// All pending actions in enqueue order.
    #[inline]
    pub fn pending(&self) -> &[QueuedAction] {
        &self.pending
    }

    /// Pending actions in one lane.
    pub fn in_slot(&self, slot: QueueSlot) -> impl Iterator<Item = &QueuedAction> + '_ {
        self.pending.iter().filter(move |a| a.slot == slot)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
