//! Error types for the wod_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for wod_core operations
///
/// The parsing pipeline itself never fails; these variants cover the
/// boundaries around it (file loading, input validation, editing).
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

    /// Input rejected at the boundary before parsing
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Editor operation addressed a movement that does not exist
    #[error("Edit error: {0}")]
    Edit(String),

    /// Movement dictionary could not be obtained
    #[error("Dictionary error: {0}")]
    Dictionary(String),
}
