use ba_behavior::{BehaviorError, ContractViolation};
use ba_chooser::ChooserError;
use ba_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArbiterError {
    #[error("arbiter configuration error: {0}")]
    Config(String),

    #[error("lifecycle contract violated: {0}")]
    Contract(#[from] ContractViolation),

    #[error(transparent)]
    Chooser(#[from] ChooserError),

    #[error(transparent)]
    Behavior(#[from] BehaviorError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type ArbiterResult<T> = Result<T, ArbiterError>;
