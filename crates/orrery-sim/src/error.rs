//! Error types for scene queries

use thiserror::Error;

/// Result type for scene operations
pub type SceneResult<T> = Result<T, SceneError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("unknown body: {0}")]
    UnknownBody(String),

    #[error("{0} does not orbit a planet")]
    NotASatellite(String),

    #[error("{0} has no revolution frame in motion")]
    Frozen(String),
}
