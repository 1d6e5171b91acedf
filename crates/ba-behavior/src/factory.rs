//! `BehaviorFactory` — the only public way to build a [`BehaviorSlot`].
//!
//! Body constructors are registered per kind.  `create` runs the body
//! constructor, then reads the keys every behavior shares:
//!
//! | Key                                      | Type                  | Default       |
//! |------------------------------------------|-----------------------|---------------|
//! | `name`                                   | string                | body kind     |
//! | `emotionScorers`                         | array of components   | none          |
//! | `flatScore`                              | number                | `0.0`         |
//! | `overrideScore`                          | number                | none          |
//! | `repetitionPenalty`                      | score graph           | `(0, 1)`      |
//! | `runningPenalty`                         | score graph           | `(0, 1)`      |
//! | `considerThisHasRunForBehaviorObjective` | objective id (u16)    | none          |
//! | `behaviorGroups`                         | array of group names  | empty         |
//! | `engineTriggers` / `gameTriggers`        | arrays of u16 tags    | empty         |
//!
//! Any error aborts construction; no half-built slot is ever returned.

use ba_core::{ObjectiveId, ScoreGraph};
use tracing::{debug, warn};

use crate::slot::SlotSettings;
use crate::{
    Behavior, BehaviorConfig, BehaviorError, BehaviorGroup, BehaviorResult, BehaviorScorer,
    BehaviorSlot, EngineTag, EventTag, GameTag, NameMap, NoopBehavior, RepetitionPenalty,
    RunningPenalty, ScoreComponent,
};

pub const NAME_KEY: &str = "name";
pub const EMOTION_SCORERS_KEY: &str = "emotionScorers";
pub const FLAT_SCORE_KEY: &str = "flatScore";
pub const OVERRIDE_SCORE_KEY: &str = "overrideScore";
pub const REPETITION_PENALTY_KEY: &str = "repetitionPenalty";
pub const RUNNING_PENALTY_KEY: &str = "runningPenalty";
pub const COOLDOWN_ON_OBJECTIVE_KEY: &str = "considerThisHasRunForBehaviorObjective";
pub const GROUPS_KEY: &str = "behaviorGroups";
pub const ENGINE_TRIGGERS_KEY: &str = "engineTriggers";
pub const GAME_TRIGGERS_KEY: &str = "gameTriggers";

type BodyCtor = Box<dyn Fn(&BehaviorConfig) -> BehaviorResult<Box<dyn Behavior>>>;

pub struct BehaviorFactory {
    ctors: NameMap<BodyCtor>,
}

impl Default for BehaviorFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl BehaviorFactory {
    /// A factory with only the built-in [`NoopBehavior`] registered.
    pub fn new() -> Self {
        let mut factory = Self { ctors: NameMap::default() };
        factory.register(NoopBehavior::KIND, |_| Ok(Box::new(NoopBehavior)));
        factory
    }

    /// Register (or replace) the body constructor for `kind`.
    pub fn register<F>(&mut self, kind: impl Into<String>, ctor: F)
    where
        F: Fn(&BehaviorConfig) -> BehaviorResult<Box<dyn Behavior>> + 'static,
    {
        let kind = kind.into();
        debug!(%kind, "behavior kind registered");
        self.ctors.insert(kind, Box::new(ctor));
    }

    pub fn is_registered(&self, kind: &str) -> bool {
        self.ctors.contains_key(kind)
    }

    /// Registered kind names, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.ctors.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Build a slot for `kind` from `config`.  Failures are logged here and
    /// returned; the caller omits the behavior.
    pub fn create(&self, kind: &str, config: &BehaviorConfig) -> BehaviorResult<BehaviorSlot> {
        self.build(kind, config).inspect_err(|e| {
            warn!(%kind, error = %e, "behavior construction failed; omitting");
        })
    }

    /// A no-op slot named `name`.  Cannot fail.
    pub fn create_noop(&self, name: &str) -> BehaviorSlot {
        let settings = SlotSettings { name: Some(name.to_string()), ..SlotSettings::default() };
        BehaviorSlot::new(Box::new(NoopBehavior), settings)
    }

    fn build(&self, kind: &str, config: &BehaviorConfig) -> BehaviorResult<BehaviorSlot> {
        let ctor = self
            .ctors
            .get(kind)
            .ok_or_else(|| BehaviorError::UnknownKind(kind.to_string()))?;
        let body = ctor(config)?;
        let settings = read_settings(config)?;
        let slot = BehaviorSlot::new(body, settings);
        debug!(%kind, behavior = %slot.name(), "behavior constructed");
        Ok(slot)
    }
}

fn read_settings(config: &BehaviorConfig) -> BehaviorResult<SlotSettings> {
    let components: Vec<ScoreComponent> = config.get_or(EMOTION_SCORERS_KEY, Vec::new())?;
    let flat_score: Option<f32> = config.optional(FLAT_SCORE_KEY)?;
    if flat_score.is_some() && !components.is_empty() {
        return Err(BehaviorError::InvalidValue {
            key:    FLAT_SCORE_KEY.to_string(),
            reason: format!("cannot be combined with {EMOTION_SCORERS_KEY}"),
        });
    }

    let repetition_penalty = match config.optional::<ScoreGraph>(REPETITION_PENALTY_KEY)? {
        Some(graph) => RepetitionPenalty::new(graph).map_err(|e| BehaviorError::InvalidValue {
            key:    REPETITION_PENALTY_KEY.to_string(),
            reason: e.to_string(),
        })?,
        None => RepetitionPenalty::default(),
    };
    let running_penalty = config
        .optional::<ScoreGraph>(RUNNING_PENALTY_KEY)?
        .map(RunningPenalty::new)
        .unwrap_or_default();

    let group_names: Vec<String> = config.get_or(GROUPS_KEY, Vec::new())?;
    let groups = BehaviorGroup::parse_set(group_names.iter().map(String::as_str)).map_err(|e| {
        BehaviorError::InvalidValue { key: GROUPS_KEY.to_string(), reason: e.to_string() }
    })?;

    let engine: Vec<u16> = config.get_or(ENGINE_TRIGGERS_KEY, Vec::new())?;
    let game: Vec<u16> = config.get_or(GAME_TRIGGERS_KEY, Vec::new())?;
    let mut triggers: Vec<EventTag> = engine
        .into_iter()
        .map(|t| EventTag::Engine(EngineTag(t)))
        .chain(game.into_iter().map(|t| EventTag::Game(GameTag(t))))
        .collect();
    triggers.dedup();

    Ok(SlotSettings {
        name: config.optional(NAME_KEY)?,
        override_score: config.optional(OVERRIDE_SCORE_KEY)?,
        flat_score: flat_score.unwrap_or(0.0),
        scorer: BehaviorScorer::from(components),
        repetition_penalty,
        running_penalty,
        groups,
        triggers,
        objective_cooldown: config.optional::<u16>(COOLDOWN_ON_OBJECTIVE_KEY)?.map(ObjectiveId),
    })
}
