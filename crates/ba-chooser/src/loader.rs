//! Build a chooser from a JSON document.
//!
//! ```json
//! {
//!   "type": "reactionary",
//!   "name": "freeplay",
//!   "behaviors": [ { "behaviorClass": "LookAround", "flatScore": 0.3 } ],
//!   "reactions": [ { "behaviorClass": "ReactToCliff", "engineTriggers": [4],
//!                    "behaviorGroups": ["ShortInterruption", "HardInterrupt"] } ]
//! }
//! ```
//!
//! `type` is one of `priority`, `scored`, `reactionary`, `selection`.  Each
//! behavior entry names its body kind in `behaviorClass`; the rest of the
//! object is the behavior's config.  Entries that fail to build are logged
//! and omitted; the chooser is still returned.  `reactions` is only
//! accepted by the reactionary chooser and every entry there must declare
//! triggers.

use ba_behavior::{BehaviorConfig, BehaviorFactory, BehaviorSlot};
use ba_core::ArbiterRng;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    BehaviorChooser, ChooserError, ChooserResult, ExplicitSelectionChooser, PriorityListChooser,
    ReactionaryChooser, ScoredChooser,
};

pub const BEHAVIOR_CLASS_KEY: &str = "behaviorClass";

#[derive(Copy, Clone, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChooserKind {
    Priority,
    Scored,
    Reactionary,
    Selection,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChooserDoc {
    #[serde(rename = "type")]
    pub kind:      ChooserKind,
    #[serde(default)]
    pub name:      Option<String>,
    #[serde(default)]
    pub behaviors: Vec<Value>,
    #[serde(default)]
    pub reactions: Vec<Value>,
}

/// Parse and build in one step.
pub fn load_chooser_str(
    json:    &str,
    factory: &BehaviorFactory,
    rng:     ArbiterRng,
) -> ChooserResult<Box<dyn BehaviorChooser>> {
    let doc: ChooserDoc = serde_json::from_str(json)?;
    load_chooser(&doc, factory, rng)
}

/// Build the chooser described by `doc`.  `rng` is used by the scored
/// variants for tie-breaking.
pub fn load_chooser(
    doc:     &ChooserDoc,
    factory: &BehaviorFactory,
    rng:     ArbiterRng,
) -> ChooserResult<Box<dyn BehaviorChooser>> {
    let name = doc.name.clone().unwrap_or_else(|| format!("{:?}", doc.kind).to_lowercase());

    if !doc.reactions.is_empty() && doc.kind != ChooserKind::Reactionary {
        return Err(ChooserError::Config(format!(
            "chooser {name:?}: only reactionary choosers take reactions"
        )));
    }

    let mut chooser: Box<dyn BehaviorChooser> = match doc.kind {
        ChooserKind::Priority    => Box::new(PriorityListChooser::new(name.as_str())),
        ChooserKind::Scored      => Box::new(ScoredChooser::new(name.as_str(), rng)),
        ChooserKind::Reactionary => Box::new(ReactionaryChooser::new(name.as_str(), rng)),
        ChooserKind::Selection   => Box::new(ExplicitSelectionChooser::new(name.as_str(), factory)?),
    };

    for entry in &doc.behaviors {
        if let Some(slot) = build_entry(entry, factory) {
            if slot.is_reactionary() && doc.kind == ChooserKind::Reactionary {
                warn!(chooser = %name, behavior = %slot.name(), "triggers on a scored behavior; list it under reactions");
                continue;
            }
            add_or_warn(chooser.as_mut(), slot);
        }
    }
    for entry in &doc.reactions {
        if let Some(slot) = build_entry(entry, factory) {
            if !slot.is_reactionary() {
                warn!(chooser = %name, behavior = %slot.name(), "reaction declares no triggers; omitting");
                continue;
            }
            add_or_warn(chooser.as_mut(), slot);
        }
    }

    info!(chooser = %name, kind = ?doc.kind, behaviors = chooser.arena().len(), "chooser loaded");
    Ok(chooser)
}

fn build_entry(entry: &Value, factory: &BehaviorFactory) -> Option<BehaviorSlot> {
    let config = match BehaviorConfig::new(entry.clone()) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "behavior entry is not an object; omitting");
            return None;
        }
    };
    let kind = match config.require_str(BEHAVIOR_CLASS_KEY) {
        Ok(kind) => kind,
        Err(e) => {
            warn!(error = %e, "behavior entry has no usable {BEHAVIOR_CLASS_KEY}; omitting");
            return None;
        }
    };
    // The factory logs construction failures itself.
    factory.create(kind, &config).ok()
}

fn add_or_warn(chooser: &mut dyn BehaviorChooser, slot: BehaviorSlot) {
    let name = slot.name().to_string();
    if let Err(e) = chooser.add(slot) {
        warn!(chooser = %chooser.name(), behavior = %name, error = %e, "could not add behavior; omitting");
    }
}
