//! Batch errors and the per-routine failure wrapper.

use super::{CodegenError, ConfigError, DialectError, SourceError, StoreError};

/// Failure of one routine, caught at the loader boundary.
/// The batch continues; the final exit status reflects it.
#[derive(Debug, thiserror::Error)]
pub enum RoutineError {
    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    Dialect(#[from] DialectError),

    #[error("{0}")]
    Codegen(#[from] CodegenError),
}

/// Errors that abort the whole run.
/// Aggregates subsystem fatals via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Dialect error: {0}")]
    Dialect(#[from] DialectError),

    #[error("Persistence error: {0}")]
    Store(#[from] StoreError),

    #[error("Constants error: {0}")]
    Codegen(#[from] CodegenError),

    #[error("Failed to scan '{path}': {message}")]
    Discovery { path: String, message: String },

    #[error("Duplicate routine name '{name}': {first} and {second}")]
    DuplicateSource {
        name: String,
        first: String,
        second: String,
    },
}
