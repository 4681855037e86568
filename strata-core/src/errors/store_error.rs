//! Persistence errors. Fatal: downstream generation depends on a
//! consistent metadata store.

/// Errors raised while reading or writing the metadata store and
/// generated artifacts.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to serialize metadata: {message}")]
    Serialize { message: String },

    #[error("Failed to parse metadata store {path}: {message}")]
    Deserialize { path: String, message: String },
}
