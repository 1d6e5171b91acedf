use std::borrow::Cow;

use ba_core::CoreError;
use thiserror::Error;

/// Construction-time failures.  A factory that returns one of these has not
/// produced a slot; the caller logs and omits the behavior.
#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("missing required key {0:?}")]
    MissingKey(String),

    #[error("invalid value for {key:?}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("unknown behavior kind {0:?}")]
    UnknownKind(String),

    #[error("duplicate behavior name {0:?}")]
    DuplicateName(String),

    #[error("behavior configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;

/// A recoverable lifecycle refusal from `init` or `interrupt`.
///
/// From `init` it means "could not start this activation"; from `interrupt`
/// it means "cannot stop safely right now, ask again later".
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct BehaviorFail {
    pub reason: Cow<'static, str>,
}

impl BehaviorFail {
    pub fn new(reason: impl Into<Cow<'static, str>>) -> Self {
        Self { reason: reason.into() }
    }
}

/// Misuse of the lifecycle by the driving code.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("update called on {0:?} while it is not running")]
    UpdateWhileNotRunning(String),
}
