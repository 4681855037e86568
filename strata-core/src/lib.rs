//! # strata-core
//!
//! Core building blocks for the strata routine manager: the routine
//! metadata model, per-subsystem errors, TOML configuration, the
//! `MetadataProvider` dialect trait, report sinks, and atomic file writes.

pub mod config;
pub mod errors;
pub mod persist;
pub mod report;
pub mod traits;
pub mod types;
