//! Error types for catalog loading

use thiserror::Error;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that make a catalog unusable
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog has no star")]
    MissingStar,

    #[error("catalog has more than one star: {0} and {1}")]
    MultipleStars(String, String),

    #[error("star {0} must not orbit anything")]
    OrbitingStar(String),

    #[error("duplicate body name: {0}")]
    DuplicateName(String),

    #[error("orbit cycle through body: {0}")]
    Cycle(String),

    #[error("body {0} is nested deeper than star -> planet -> moon")]
    TooDeep(String),

    #[error("body {name}: invalid {field} ({value})")]
    InvalidField {
        name: String,
        field: &'static str,
        value: f64,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
