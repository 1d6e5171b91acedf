//! Highest-score selection.
//!
//! Every candidate's `evaluate_score` is computed and the maximum wins.  Exact
//! ties are broken uniformly at random with the chooser's own
//! [`ArbiterRng`], so a fixed seed reproduces every decision.  The behavior
//! already holding control keeps a tie it is part of, which avoids swapping
//! between equally good behaviors every tick.  All-zero scores mean `None`.

use ba_behavior::{BehaviorArena, BehaviorSlot, World};
use ba_core::{ArbiterRng, BehaviorId, Timestamp};
use tracing::trace;

use crate::{BehaviorChooser, ChooserResult, Decision};

#[derive(Debug)]
pub struct ScoredChooser {
    name:       String,
    arena:      BehaviorArena,
    /// Behaviors taking part in scoring, in insertion order.
    candidates: Vec<BehaviorId>,
    rng:        ArbiterRng,
    /// Scratch buffer for tied candidates, reused across ticks.
    ties:       Vec<BehaviorId>,
}

impl ScoredChooser {
    pub fn new(name: impl Into<String>, rng: ArbiterRng) -> Self {
        Self {
            name:       name.into(),
            arena:      BehaviorArena::new(),
            candidates: Vec::new(),
            rng,
            ties:       Vec::new(),
        }
    }

    /// Own `slot` without making it a scoring candidate.
    pub(crate) fn insert_unscored(&mut self, slot: BehaviorSlot) -> ChooserResult<BehaviorId> {
        Ok(self.arena.insert(slot)?)
    }

    pub fn candidates(&self) -> &[BehaviorId] {
        &self.candidates
    }

    /// Current score of every candidate, in insertion order.
    pub fn scores(&self, world: &World, now: Timestamp) -> Vec<(BehaviorId, f32)> {
        self.candidates
            .iter()
            .filter_map(|&id| self.arena.get(id).map(|s| (id, s.evaluate_score(world, now))))
            .collect()
    }
}

impl BehaviorChooser for ScoredChooser {
    fn name(&self) -> &str {
        &self.name
    }

    fn add(&mut self, slot: BehaviorSlot) -> ChooserResult<BehaviorId> {
        let id = self.arena.insert(slot)?;
        self.candidates.push(id);
        Ok(id)
    }

    fn arena(&self) -> &BehaviorArena {
        &self.arena
    }

    fn arena_mut(&mut self) -> &mut BehaviorArena {
        &mut self.arena
    }

    fn tick(&mut self, world: &World, now: Timestamp, active: Option<BehaviorId>) -> Decision {
        let mut best = 0.0f32;
        self.ties.clear();
        for &id in &self.candidates {
            let Some(slot) = self.arena.get(id) else { continue };
            let score = slot.evaluate_score(world, now);
            trace!(behavior = %slot.name(), score, "scored");
            if score > best {
                best = score;
                self.ties.clear();
                self.ties.push(id);
            } else if score == best && score > 0.0 {
                self.ties.push(id);
            }
        }

        match self.ties.as_slice() {
            [] => None,
            [only] => Some(*only),
            tied => {
                if let Some(current) = active.filter(|a| tied.contains(a)) {
                    return Some(current);
                }
                self.rng.choose(tied).copied()
            }
        }
    }
}
