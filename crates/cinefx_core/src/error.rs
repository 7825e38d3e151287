//! Coordinator Error Types
//!
//! Hardware failures never show up here: the coordinator logs and absorbs
//! them. These are the failures a caller can actually act on.

use thiserror::Error;

/// Errors surfaced by the effects coordinator and its observers
#[derive(Error, Debug)]
pub enum EffectError {
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Snapshot publisher closed - coordinator dropped")]
    PublisherClosed,

    #[error("Timed out waiting for a snapshot update")]
    Timeout,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for coordinator operations
pub type EffectResult<T> = Result<T, EffectError>;
