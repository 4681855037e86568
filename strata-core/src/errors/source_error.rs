//! Routine source format errors.
//!
//! Every variant is scoped to a single routine file: the loader logs it,
//! skips the routine, and the batch continues.

/// Errors raised while reading or interpreting one routine source file.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Source file does not exist")]
    Missing,

    #[error("Failed to read source file: {message}")]
    Read { message: String },

    #[error("Unknown placeholder(s): {}", placeholders.join(", "))]
    UnknownPlaceholders { placeholders: Vec<String> },

    #[error("Routine body start marker not found")]
    MissingBodyMarker,

    #[error("Designation annotation line is missing")]
    MissingAnnotation,

    #[error("Malformed designation annotation: '{line}'")]
    MalformedAnnotation { line: String },

    #[error("Designation '{tag}' does not take arguments")]
    UnexpectedArguments { tag: String },

    #[error("Expected '-- type: bulk_insert <table_name> <columns>'")]
    MalformedBulkInsert,

    #[error("Unable to find the stored routine name and type")]
    MissingHeader,

    #[error("Stored routine name '{declared}' does not match filename (expected '{expected}')")]
    NameMismatch { declared: String, expected: String },

    #[error("Number of fields {fields} and number of columns {columns} don't match for table '{table}'")]
    ColumnCountMismatch {
        table: String,
        fields: usize,
        columns: usize,
    },
}
