//! `ba-core` — foundational types for the behavior arbitration engine.
//!
//! This crate is a dependency of every other `ba-*` crate.  It has no `ba-*`
//! dependencies and only a handful of external ones (`rand`, `serde`,
//! `thiserror`, `tracing`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`ids`]       | `BehaviorId`, `ActionTag`, `ObjectiveId`                  |
//! | [`time`]      | `Timestamp`, `ArbiterClock` (monotonic, clamps regressions) |
//! | [`rng`]       | `ArbiterRng` — seeded tie-break source, split per chooser |
//! | [`curve`]     | `ScoreGraph` — piecewise-linear x → y mapping             |
//! | [`emotion`]   | `EmotionKind`, `EmotionSource`, `EmotionState`            |
//! | [`config`]    | `ArbiterConfig`, `EscalationPolicy`                       |
//! | [`error`]     | `CoreError`, `CoreResult`                                 |

pub mod config;
pub mod curve;
pub mod emotion;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ArbiterConfig, EscalationPolicy};
pub use curve::{GraphNode, ScoreGraph};
pub use emotion::{EmotionKind, EmotionSource, EmotionState};
pub use error::{CoreError, CoreResult};
pub use ids::{ActionTag, BehaviorId, ObjectiveId};
pub use rng::ArbiterRng;
pub use time::{ArbiterClock, Timestamp};
