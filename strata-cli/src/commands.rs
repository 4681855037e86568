//! Phase orchestration behind the CLI.
//!
//! Each phase returns the number of routines that failed; the binary
//! turns a nonzero count into a nonzero exit status while fatal errors
//! bubble up as `BatchError`.

use std::path::Path;

use strata_codegen::{generate_wrappers, synchronize_constants};
use strata_core::config::StrataConfig;
use strata_core::errors::BatchError;
use strata_core::report::{ConsoleSink, ReportSink};
use strata_core::traits::MetadataProvider;
use strata_loader::{run_batch, BatchOptions};
use strata_storage::{create_provider, MetadataStore};

use crate::cli::Command;

fn load_context(config_path: &Path) -> Result<(StrataConfig, Box<dyn MetadataProvider>), BatchError> {
    let config = StrataConfig::load(config_path)?;
    let provider = create_provider(config.project.effective_dialect(), &config.database)?;
    Ok((config, provider))
}

/// Runs one named phase.
pub fn run_command(command: &Command, prune: bool) -> Result<usize, BatchError> {
    match command {
        Command::Routines(args) => routines(&args.config, prune),
        Command::Constants(args) => constants(&args.config),
        Command::Wrapper(args) => wrapper(&args.config),
    }
}

/// Runs every phase in order: routines, constants, wrappers.
pub fn run_all(config_path: &Path, prune: bool) -> Result<usize, BatchError> {
    let (config, provider) = load_context(config_path)?;
    let sink = ConsoleSink;
    let mut failures = 0;

    let report = run_batch(&config, provider.as_ref(), &sink, &BatchOptions { prune })?;
    failures += report.failed.len();

    failures += constants_phase(&config, provider.as_ref(), &sink)?;
    failures += wrapper_phase(&config, provider.as_ref(), &sink)?;

    Ok(failures)
}

fn routines(config_path: &Path, prune: bool) -> Result<usize, BatchError> {
    let (config, provider) = load_context(config_path)?;
    let sink = ConsoleSink;
    let report = run_batch(&config, provider.as_ref(), &sink, &BatchOptions { prune })?;
    Ok(report.failed.len())
}

fn constants(config_path: &Path) -> Result<usize, BatchError> {
    let (config, provider) = load_context(config_path)?;
    constants_phase(&config, provider.as_ref(), &ConsoleSink)
}

fn wrapper(config_path: &Path) -> Result<usize, BatchError> {
    let (config, provider) = load_context(config_path)?;
    wrapper_phase(&config, provider.as_ref(), &ConsoleSink)
}

fn constants_phase(
    config: &StrataConfig,
    provider: &dyn MetadataProvider,
    sink: &dyn ReportSink,
) -> Result<usize, BatchError> {
    match &config.constants {
        Some(section) => {
            synchronize_constants(section, provider, sink)?;
        }
        None => sink.info("Constants not enabled."),
    }
    Ok(0)
}

fn wrapper_phase(
    config: &StrataConfig,
    provider: &dyn MetadataProvider,
    sink: &dyn ReportSink,
) -> Result<usize, BatchError> {
    match &config.wrapper {
        Some(section) => {
            let store = MetadataStore::new(&config.project.effective_metadata());
            let routines = store.load()?;
            let report = generate_wrappers(section, &routines, provider.type_table(), sink)?;
            Ok(report.failed.len())
        }
        None => {
            sink.info("Wrappers not enabled.");
            Ok(0)
        }
    }
}
