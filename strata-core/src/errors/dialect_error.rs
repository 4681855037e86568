//! Database dialect errors.

/// Errors raised by a `MetadataProvider` implementation.
#[derive(Debug, thiserror::Error)]
pub enum DialectError {
    #[error("Unknown dialect '{tag}'")]
    UnknownDialect { tag: String },

    #[error("Failed to open database: {message}")]
    Connection { message: String },

    #[error("SQLite error: {message}")]
    Sqlite { message: String },

    #[error("Database rejected routine source: {message}")]
    InstallRejected { message: String },

    #[error("No installed routine named '{name}'")]
    MissingRoutine { name: String },

    #[error("Table '{table}' does not exist")]
    MissingTable { table: String },
}
