//! Configuration errors. Always fatal, raised before any database I/O.

/// Errors raised while loading or validating the TOML configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Missing required setting '{setting}'")]
    MissingSetting { setting: String },

    #[error("Invalid setting '{setting}': {message}")]
    InvalidSetting { setting: String, message: String },
}
