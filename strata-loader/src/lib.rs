//! # strata-loader
//!
//! Turns annotated routine source files into installed database routines
//! and persisted metadata: source discovery, placeholder substitution,
//! designation parsing, change fingerprinting, and batch orchestration.

pub mod batch;
pub mod designation;
pub mod discovery;
pub mod fingerprint;
pub mod header;
pub mod loader;
pub mod placeholders;

pub use batch::{run_batch, BatchOptions, BatchReport};
pub use loader::{LoadOutcome, RoutineLoader};
