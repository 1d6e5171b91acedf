//! Scored selection plus event-triggered reactions.
//!
//! # Policy
//!
//! Behaviors with a non-empty trigger set are *reactions*; everything else is
//! scored by the wrapped [`ScoredChooser`].
//!
//! * On every incoming event, before scoring, reactions are checked in
//!   registration order.  The first one whose trigger set contains the event
//!   tag, that no lock disables, that is runnable, and that is not already
//!   active is returned as a [`Reaction`]; the arbiter switches to it in the
//!   same tick.
//! * If the reaction is a `ShortInterruption`, the scored behavior it
//!   displaces is remembered.  A chain of short reactions keeps the first
//!   displaced behavior; a reaction that is not short forgets it.  When the
//!   reaction completes normally the remembered behavior is handed back as a
//!   [`ResumeTarget`].
//!   A remembered behavior that finishes on its own before the reaction
//!   takes over is forgotten.
//! * While a reaction is active and running, scoring does not replace it.
//!
//! Reactions can be disabled under a named lock (e.g. a game that must not be
//! interrupted by face greetings).  A reaction is eligible only while no lock
//! disables it.

use std::collections::BTreeSet;

use ba_behavior::{BehaviorArena, BehaviorGroup, BehaviorSlot, Event, World};
use ba_core::{ArbiterRng, BehaviorId, Timestamp};
use tracing::{debug, info, warn};

use crate::{
    BehaviorChooser, ChooserCommand, ChooserResult, Decision, Reaction, ResumeTarget, ScoredChooser,
};

#[derive(Debug)]
pub struct ReactionaryChooser {
    scored:    ScoredChooser,
    /// Reactions in registration order.
    reactions: Vec<BehaviorId>,
    /// `(lock, reaction)` pairs currently disabling a reaction.
    locks:     BTreeSet<(String, BehaviorId)>,
    resume:    Option<BehaviorId>,
}

impl ReactionaryChooser {
    pub fn new(name: impl Into<String>, rng: ArbiterRng) -> Self {
        Self {
            scored:    ScoredChooser::new(name, rng),
            reactions: Vec::new(),
            locks:     BTreeSet::new(),
            resume:    None,
        }
    }

    pub fn reactions(&self) -> &[BehaviorId] {
        &self.reactions
    }

    pub fn is_reaction(&self, id: BehaviorId) -> bool {
        self.reactions.contains(&id)
    }

    /// The behavior that will resume when the active short reaction
    /// completes.
    pub fn pending_resume(&self) -> Option<BehaviorId> {
        self.resume
    }

    /// Disable reaction `behavior` under `lock`.  Returns `false` if
    /// `behavior` is not a reaction of this chooser.
    pub fn disable_reaction(&mut self, lock: &str, behavior: &str) -> bool {
        let Some(id) = self.reaction_id(behavior) else { return false };
        if self.locks.insert((lock.to_string(), id)) {
            info!(%lock, reaction = %behavior, "reaction disabled");
        }
        true
    }

    /// Release `lock` on reaction `behavior`.  Other locks stay in force.
    pub fn enable_reaction(&mut self, lock: &str, behavior: &str) -> bool {
        let Some(id) = self.reaction_id(behavior) else { return false };
        if self.locks.remove(&(lock.to_string(), id)) {
            info!(%lock, reaction = %behavior, "reaction lock released");
        } else {
            debug!(%lock, reaction = %behavior, "lock was not held");
        }
        true
    }

    pub fn is_reaction_enabled(&self, id: BehaviorId) -> bool {
        !self.locks.iter().any(|(_, locked)| *locked == id)
    }

    fn reaction_id(&self, name: &str) -> Option<BehaviorId> {
        let id = self.scored.arena().id_of(name).filter(|id| self.is_reaction(*id));
        if id.is_none() {
            warn!(chooser = %self.scored.name(), reaction = %name, "unknown reaction");
        }
        id
    }
}

impl BehaviorChooser for ReactionaryChooser {
    fn name(&self) -> &str {
        self.scored.name()
    }

    /// Behaviors with triggers become reactions; the rest are scored.
    fn add(&mut self, slot: BehaviorSlot) -> ChooserResult<BehaviorId> {
        if slot.is_reactionary() {
            let id = self.scored.insert_unscored(slot)?;
            self.reactions.push(id);
            Ok(id)
        } else {
            self.scored.add(slot)
        }
    }

    fn arena(&self) -> &BehaviorArena {
        self.scored.arena()
    }

    fn arena_mut(&mut self) -> &mut BehaviorArena {
        self.scored.arena_mut()
    }

    fn tick(&mut self, world: &World, now: Timestamp, active: Option<BehaviorId>) -> Decision {
        if let Some(current) = active.filter(|&id| self.is_reaction(id)) {
            if self.scored.arena().get(current).is_some_and(BehaviorSlot::is_running) {
                return Some(current);
            }
        }
        // No reaction holds control, so there is nothing to resume into.
        self.resume = None;
        self.scored.tick(world, now, active)
    }

    fn react(
        &mut self,
        event:  &Event,
        world:  &World,
        now:    Timestamp,
        active: Option<BehaviorId>,
    ) -> Option<Reaction> {
        let arena = self.scored.arena();
        let (id, slot) = self.reactions.iter().find_map(|&id| {
            let slot = arena.get(id)?;
            let eligible = slot.is_triggered_by(event.tag)
                && Some(id) != active
                && self.is_reaction_enabled(id)
                && slot.is_runnable(world, now);
            eligible.then_some((id, slot))
        })?;

        let reaction = Reaction {
            behavior: id,
            hard:     slot.has_group(BehaviorGroup::HardInterrupt),
            short:    slot.has_group(BehaviorGroup::ShortInterruption),
        };
        info!(reaction = %slot.name(), tag = %event.tag, short = reaction.short, "reaction triggered");

        if reaction.short {
            if self.resume.is_none() {
                self.resume = active.filter(|a| !self.is_reaction(*a));
            }
        } else {
            self.resume = None;
        }
        Some(reaction)
    }

    fn take_resume_target(&mut self, finished: BehaviorId, completed_normally: bool) -> Option<ResumeTarget> {
        if !self.is_reaction(finished) {
            // Finished on its own before the reaction took over.
            if self.resume == Some(finished) {
                self.resume = None;
            }
            return None;
        }
        let target = self.resume.take()?;
        let slot = self.scored.arena().get(finished)?;
        if !completed_normally || !slot.has_group(BehaviorGroup::ShortInterruption) {
            debug!(reaction = %slot.name(), "reaction did not complete normally; not resuming");
            return None;
        }
        Some(ResumeTarget {
            behavior: target,
            limited:  slot.has_group(BehaviorGroup::ResumeLimited),
        })
    }

    fn handle_command(&mut self, command: &ChooserCommand) -> bool {
        match command {
            ChooserCommand::DisableReaction { lock, behavior } => self.disable_reaction(lock, behavior),
            ChooserCommand::EnableReaction { lock, behavior } => self.enable_reaction(lock, behavior),
            ChooserCommand::SelectBehaviorByName(_) => false,
        }
    }
}
