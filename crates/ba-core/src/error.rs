//! Framework error type.
//!
//! Sub-crates define their own error enums and convert `CoreError` into them
//! via `#[from]`, so `?` works across crate boundaries.

use thiserror::Error;

/// The top-level error type for `ba-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid score graph: {0}")]
    InvalidGraph(String),

    #[error("unknown emotion kind {0:?}")]
    UnknownEmotion(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `ba-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
