use ba_behavior::BehaviorError;
use ba_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChooserError {
    #[error("chooser configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Behavior(#[from] BehaviorError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<serde_json::Error> for ChooserError {
    fn from(e: serde_json::Error) -> Self {
        ChooserError::Core(CoreError::Json(e))
    }
}

pub type ChooserResult<T> = Result<T, ChooserError>;
