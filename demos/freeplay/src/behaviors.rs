//! Toy behavior bodies for the freeplay demo.

use ba_behavior::{
    ActionCompletion, Behavior, BehaviorConfig, BehaviorFactory, BehaviorFail, BehaviorResult,
    EngineTag, GameTag, QueueSlot, Status, WorldView, WorldViewMut,
};
use ba_core::{ActionTag, EmotionKind, EmotionSource, Timestamp};

// ── Event tags ────────────────────────────────────────────────────────────────

pub const CLIFF_DETECTED: EngineTag = EngineTag(10);
pub const PICKED_UP:      EngineTag = EngineTag(11);
pub const FACE_SEEN:      GameTag   = GameTag(20);

/// Register every demo body on `factory`.
pub fn register_all(factory: &mut BehaviorFactory) {
    factory.register(Wander::KIND, |c| Ok(Box::new(Wander::from_config(c)?)));
    factory.register(Sleep::KIND, |c| Ok(Box::new(Sleep::from_config(c)?)));
    factory.register(ReactToStimulus::KIND, |c| Ok(Box::new(ReactToStimulus::from_config(c)?)));
}

// ── Wander ────────────────────────────────────────────────────────────────────

/// Drives `legs` legs one after the other, then completes.  A resumed
/// activation carries on with the legs that are left.
#[derive(Debug)]
pub struct Wander {
    legs:    u32,
    driven:  u32,
    current: Option<ActionTag>,
}

impl Wander {
    pub const KIND: &'static str = "Wander";

    pub fn from_config(config: &BehaviorConfig) -> BehaviorResult<Self> {
        Ok(Self { legs: config.get_or("legs", 3)?, driven: 0, current: None })
    }

    fn drive(&mut self, world: &mut WorldViewMut<'_>) {
        self.current = Some(world.start_action(QueueSlot::DEFAULT, "drive_leg", vec![]));
    }
}

impl Behavior for Wander {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn is_runnable(&self, _world: WorldView<'_>, _now: Timestamp) -> bool {
        self.legs > 0
    }

    fn init(&mut self, mut world: WorldViewMut<'_>, _now: Timestamp, is_resuming: bool) -> Result<(), BehaviorFail> {
        if !is_resuming || self.driven >= self.legs {
            self.driven = 0;
        }
        self.drive(&mut world);
        Ok(())
    }

    fn update(&mut self, _world: WorldViewMut<'_>, _now: Timestamp) -> Status {
        if self.driven >= self.legs { Status::Complete } else { Status::Running }
    }

    fn stop(&mut self, _world: WorldViewMut<'_>, _now: Timestamp) {
        self.current = None;
    }

    fn on_action_completed(&mut self, completion: ActionCompletion, mut world: WorldViewMut<'_>) {
        if Some(completion.tag) != self.current {
            return;
        }
        self.driven += 1;
        self.current = None;
        if self.driven < self.legs {
            self.drive(&mut world);
        }
    }

    fn state_name(&self) -> &str {
        if self.current.is_some() { "Driving" } else { "Parked" }
    }
}

// ── Sleep ─────────────────────────────────────────────────────────────────────

/// Lies down while calm.  Refuses interrupts until it has settled.
#[derive(Debug)]
pub struct Sleep {
    min_calm:   f32,
    settle_ms:  u64,
    settled_at: Timestamp,
    settled:    bool,
}

impl Sleep {
    pub const KIND: &'static str = "Sleep";

    pub fn from_config(config: &BehaviorConfig) -> BehaviorResult<Self> {
        Ok(Self {
            min_calm:   config.get_or("minCalm", 0.5)?,
            settle_ms:  config.get_or("settleTime_ms", 0)?,
            settled_at: Timestamp::ZERO,
            settled:    false,
        })
    }
}

impl Behavior for Sleep {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn is_runnable(&self, world: WorldView<'_>, _now: Timestamp) -> bool {
        world.emotions().value(EmotionKind::Calm) >= self.min_calm
    }

    fn init(&mut self, mut world: WorldViewMut<'_>, now: Timestamp, _is_resuming: bool) -> Result<(), BehaviorFail> {
        self.settled_at = now.offset_millis(self.settle_ms);
        self.settled = false;
        world.start_action(QueueSlot::DEFAULT, "lie_down", vec![]);
        Ok(())
    }

    fn update(&mut self, _world: WorldViewMut<'_>, now: Timestamp) -> Status {
        self.settled = now >= self.settled_at;
        Status::Running
    }

    fn interrupt(&mut self, _world: WorldViewMut<'_>, now: Timestamp, _is_short: bool) -> Result<(), BehaviorFail> {
        if now < self.settled_at {
            return Err(BehaviorFail::new("still lying down"));
        }
        Ok(())
    }

    fn state_name(&self) -> &str {
        if self.settled { "Asleep" } else { "Settling" }
    }
}

// ── ReactToStimulus ───────────────────────────────────────────────────────────

/// Plays one reaction animation group and completes when it finishes.
///
/// Config keys: `reactionAnimGroup` (required), `coolDownDuration_ms`
/// (default 0): after a reaction ends it cannot run again for this long.
#[derive(Debug)]
pub struct ReactToStimulus {
    anim_group:    String,
    cool_down_ms:  u64,
    last_finished: Option<Timestamp>,
    playing:       Option<ActionTag>,
    done:          bool,
}

impl ReactToStimulus {
    pub const KIND: &'static str = "ReactToStimulus";

    pub fn from_config(config: &BehaviorConfig) -> BehaviorResult<Self> {
        Ok(Self {
            anim_group:    config.require("reactionAnimGroup")?,
            cool_down_ms:  config.get_or("coolDownDuration_ms", 0)?,
            last_finished: None,
            playing:       None,
            done:          false,
        })
    }

    pub fn anim_group(&self) -> &str {
        &self.anim_group
    }

    pub fn cool_down_duration_ms(&self) -> u64 {
        self.cool_down_ms
    }
}

impl Behavior for ReactToStimulus {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn is_runnable(&self, _world: WorldView<'_>, now: Timestamp) -> bool {
        self.last_finished
            .is_none_or(|t| now >= t.offset_millis(self.cool_down_ms))
    }

    fn init(&mut self, mut world: WorldViewMut<'_>, _now: Timestamp, _is_resuming: bool) -> Result<(), BehaviorFail> {
        let action = format!("play_anim:{}", self.anim_group);
        self.playing = Some(world.start_action(QueueSlot::DEFAULT, action, vec![]));
        self.done = false;
        Ok(())
    }

    fn update(&mut self, _world: WorldViewMut<'_>, _now: Timestamp) -> Status {
        if self.done { Status::Complete } else { Status::Running }
    }

    fn stop(&mut self, _world: WorldViewMut<'_>, now: Timestamp) {
        self.playing = None;
        self.last_finished = Some(now);
    }

    fn on_action_completed(&mut self, completion: ActionCompletion, _world: WorldViewMut<'_>) {
        if Some(completion.tag) == self.playing {
            self.done = true;
        }
    }

    fn state_name(&self) -> &str {
        match (self.playing, self.done) {
            (Some(_), false) => "Playing",
            (Some(_), true)  => "Finished",
            (None, _)        => "Ready",
        }
    }
}
