//! `ba-arbiter` — arbitration loop for the behavior arbitration engine.
//!
//! # Tick loop
//!
//! ```text
//! tick(now):
//!   ① Clock    — accept now; a regressing value is clamped to the last one.
//!   ② Refresh  — every behavior refreshes cached targets.
//!   ③ Events   — queued events in arrival order:
//!                  action completion → issuing behavior (if still running)
//!                  every behavior    → always, then running / not-running
//!                  chooser.react     → a reaction takes over immediately
//!   ④ Retry    — a reaction whose interrupt was refused tries again.
//!   ⑤ Decide   — chooser.tick; a different decision hands control over
//!                (interrupt → stop → init).
//!   ⑥ Update   — active behavior steps; Complete / Failure → stop, and a
//!                finished short reaction resumes what it displaced.
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ba_arbiter::ArbiterBuilder;
//! use ba_behavior::BehaviorFactory;
//! use ba_core::{ArbiterConfig, Timestamp};
//!
//! let factory = BehaviorFactory::new();
//! let mut arbiter = ArbiterBuilder::new(ArbiterConfig::default())
//!     .chooser_json(CHOOSER_JSON, &factory)?
//!     .build()?;
//! arbiter.tick(Timestamp(0))?;
//! ```

pub mod arbiter;
pub mod builder;
pub mod error;
pub mod observer;


pub use arbiter::Arbiter;
pub use builder::ArbiterBuilder;
pub use error::{ArbiterError, ArbiterResult};
pub use observer::{ArbiterObserver, NoopObserver, StopReason};
