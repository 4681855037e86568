//! Error handling for strata.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod batch_error;
pub mod codegen_error;
pub mod config_error;
pub mod dialect_error;
pub mod source_error;
pub mod store_error;

pub use batch_error::{BatchError, RoutineError};
pub use codegen_error::CodegenError;
pub use config_error::ConfigError;
pub use dialect_error::DialectError;
pub use source_error::SourceError;
pub use store_error::StoreError;
