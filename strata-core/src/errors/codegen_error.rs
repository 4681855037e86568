//! Code generation errors.

/// Errors raised while generating wrapper code or constants.
///
/// `UnknownType` is scoped to the routine being generated; the symbol
/// collisions are fatal for the whole run.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("Unknown {dialect} type '{data_type}'")]
    UnknownType {
        dialect: &'static str,
        data_type: String,
    },

    #[error("Duplicate type table entry '{data_type}'")]
    DuplicateTypeEntry { data_type: String },

    #[error("Constant symbol '{symbol}' derived for both {first} and {second}")]
    DuplicateSymbol {
        symbol: String,
        first: String,
        second: String,
    },

    #[error("Malformed constants registry line {line}: '{content}'")]
    MalformedRegistryLine { line: usize, content: String },

    #[error("No wrapper exists for designation '{tag}'")]
    UnknownDesignation { tag: String },

    #[error("Routine '{routine}' metadata is missing {detail}")]
    IncompleteMetadata {
        routine: String,
        detail: &'static str,
    },
}
