//! Error types for the stint_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for stint_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// Referenced user or profile does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Input rejected before reaching the engine (hours range, goal value)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A concurrent write invalidated an atomic store precondition.
    /// The caller should re-read and retry; the engine never retries itself.
    #[error("store conflict: {0}")]
    StoreConflict(String),

    /// Transient collaborator failure, propagated as-is
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}
