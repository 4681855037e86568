//! # strata-codegen
//!
//! Generation half of strata: synchronizes the constants registry with
//! the live schema and renders the stored routine wrapper module from
//! persisted metadata. Both artifacts are deterministic and rewritten
//! only when their content changes.

pub mod constants;
pub mod wrapper;

pub use constants::{synchronize_constants, ConstantsReport};
pub use wrapper::{generate_wrappers, WrapperReport};
