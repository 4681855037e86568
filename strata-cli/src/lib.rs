//! # strata-cli
//!
//! Thin command line shell over the strata library crates: argument
//! parsing, logging setup, and phase orchestration. The binary itself
//! only maps outcomes to exit codes.

pub mod cli;
pub mod commands;
pub mod logging;
