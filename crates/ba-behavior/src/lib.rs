//! `ba-behavior` — the behavior contract and everything a chooser needs to
//! drive it.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                        |
//! |----------------|-----------------------------------------------------------------|
//! | [`model`]      | `Behavior` trait (the body), `Status`                           |
//! | [`slot`]       | `BehaviorSlot` — lifecycle wrapper owning one boxed body        |
//! | [`arena`]      | `BehaviorArena` — insertion-ordered owner of slots              |
//! | [`factory`]    | `BehaviorFactory` — the only way to build a slot                |
//! | [`params`]     | `BehaviorConfig` — schema-less JSON config with typed getters   |
//! | [`scorer`]     | `BehaviorScorer` — veto-or-mean emotion scoring                 |
//! | [`penalty`]    | `RepetitionPenalty`, `RunningPenalty`                           |
//! | [`event`]      | `EventTag`, `Event`, `EventPayload`                             |
//! | [`group`]      | `BehaviorGroup` flags                                           |
//! | [`action`]     | `ActionQueue` — shared actuator queue with owner correlation    |
//! | [`blackboard`] | `Blackboard` — type-erased world facts                          |
//! | [`world`]      | `World`, `WorldView` (read-only), `WorldViewMut` (read-write)   |
//! | [`noop`]       | `NoopBehavior` — fallback that idles forever                    |
//! | [`error`]      | `BehaviorError`, `BehaviorFail`, `ContractViolation`            |
//!
//! # Design notes
//!
//! A behavior is split in two.  The *body* (`Box<dyn Behavior>`) is the
//! domain logic written by behavior authors.  The *slot* owns the body plus
//! everything the arbitration engine tracks about it: running flag, timestamps,
//! scorer, penalties, trigger tags.  Only the slot can flip `is_running`, so
//! the lifecycle rules are enforced in one place no matter what the body does.
//!
//! Read-only callbacks (`is_runnable`, `score`, `on_event_always`,
//! `on_event_while_not_running`) receive a [`WorldView`]; callbacks that may
//! act on the robot receive a [`WorldViewMut`].  The split is checked by the
//! compiler, not by convention.

pub mod action;
pub mod arena;
pub mod blackboard;
pub mod error;
pub mod event;
pub mod factory;
pub mod group;
pub mod model;
pub mod noop;
pub mod params;
pub mod penalty;
pub mod scorer;
pub mod slot;
pub mod world;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

#[cfg(test)]
mod tests;

pub use action::{ActionQueue, ActionResult, QueueSlot, QueuedAction};
pub use arena::BehaviorArena;
pub use blackboard::Blackboard;
pub use error::{BehaviorError, BehaviorFail, BehaviorResult, ContractViolation};
pub use event::{ActionCompletion, EngineTag, Event, EventPayload, EventTag, GameTag};
pub use factory::BehaviorFactory;
pub use group::BehaviorGroup;
pub use model::{AsAny, Behavior, Status};
pub use noop::NoopBehavior;
pub use params::BehaviorConfig;
pub use penalty::{RepetitionPenalty, RunningPenalty};
pub use scorer::{BehaviorScorer, ScoreComponent};
pub use slot::BehaviorSlot;
pub use world::{World, WorldView, WorldViewMut};

#[cfg(feature = "fx-hash")]
pub(crate) type NameMap<V> = rustc_hash::FxHashMap<String, V>;
#[cfg(not(feature = "fx-hash"))]
pub(crate) type NameMap<V> = std::collections::HashMap<String, V>;
