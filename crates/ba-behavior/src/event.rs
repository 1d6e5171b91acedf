//! Tagged world events.
//!
//! Tags live in two disjoint spaces: engine-originated (sensors, action
//! completion) and game-originated (app / game-layer messages).  The engine
//! never interprets payloads except for the two built-in kinds it routes
//! itself: action completion and objective achievement.

use std::fmt;

use ba_core::{ActionTag, ObjectiveId};

use crate::ActionResult;

/// Engine-originated event kind.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct EngineTag(pub u16);

impl EngineTag {
    /// An action on the shared queue finished; payload is
    /// [`EventPayload::ActionCompleted`].
    pub const ROBOT_COMPLETED_ACTION: EngineTag = EngineTag(0);
}

/// Game-originated event kind.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct GameTag(pub u16);

impl GameTag {
    /// A behavior objective was achieved; payload is
    /// [`EventPayload::ObjectiveAchieved`].
    pub const BEHAVIOR_OBJECTIVE_ACHIEVED: GameTag = GameTag(0);
}

/// Event kind in either tag space.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum EventTag {
    Engine(EngineTag),
    Game(GameTag),
}

impl From<EngineTag> for EventTag {
    fn from(tag: EngineTag) -> Self {
        EventTag::Engine(tag)
    }
}

impl From<GameTag> for EventTag {
    fn from(tag: GameTag) -> Self {
        EventTag::Game(tag)
    }
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTag::Engine(t) => write!(f, "engine:{}", t.0),
            EventTag::Game(t)   => write!(f, "game:{}", t.0),
        }
    }
}

/// Completion report for one queued action.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ActionCompletion {
    pub tag:    ActionTag,
    pub result: ActionResult,
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum EventPayload {
    #[default]
    None,
    ActionCompleted(ActionCompletion),
    ObjectiveAchieved(ObjectiveId),
    /// Opaque bytes for the subscriber to decode.
    Opaque(Vec<u8>),
}

/// One world event as delivered to behaviors.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Event {
    pub tag:     EventTag,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(tag: impl Into<EventTag>, payload: EventPayload) -> Self {
        Self { tag: tag.into(), payload }
    }

    /// Payload-less event.
    pub fn bare(tag: impl Into<EventTag>) -> Self {
        Self::new(tag, EventPayload::None)
    }

    pub fn action_completed(tag: ActionTag, result: ActionResult) -> Self {
        Self::new(
            EngineTag::ROBOT_COMPLETED_ACTION,
            EventPayload::ActionCompleted(ActionCompletion { tag, result }),
        )
    }

    pub fn objective_achieved(objective: ObjectiveId) -> Self {
        Self::new(
            GameTag::BEHAVIOR_OBJECTIVE_ACHIEVED,
            EventPayload::ObjectiveAchieved(objective),
        )
    }

    /// The completion record if this is a well-formed action-completed event.
    pub fn as_action_completion(&self) -> Option<ActionCompletion> {
        match (self.tag, &self.payload) {
            (EventTag::Engine(EngineTag::ROBOT_COMPLETED_ACTION), EventPayload::ActionCompleted(c)) => {
                Some(*c)
            }
            _ => None,
        }
    }

    /// The objective if this is a well-formed objective-achieved event.
    pub fn as_objective(&self) -> Option<ObjectiveId> {
        match (self.tag, &self.payload) {
            (EventTag::Game(GameTag::BEHAVIOR_OBJECTIVE_ACHIEVED), EventPayload::ObjectiveAchieved(o)) => {
                Some(*o)
            }
            _ => None,
        }
    }
}
