//! Batch orchestration over all discovered routine sources.
//!
//! One failing routine never stops the batch: the failure is reported,
//! counted, and the next file is processed. Metadata is persisted after
//! every successful load so a crash mid-run loses at most the routine in
//! flight.

use std::collections::BTreeSet;

use strata_core::config::StrataConfig;
use strata_core::errors::{BatchError, ConfigError, RoutineError};
use strata_core::report::ReportSink;
use strata_core::traits::MetadataProvider;
use strata_storage::MetadataStore;
use tracing::{info, warn};

use crate::discovery::discover_sources;
use crate::loader::RoutineLoader;

/// Knobs of one batch run.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Remove metadata of routines whose source file no longer exists.
    pub prune: bool,
}

/// Outcome of one batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Routines (re)loaded into the database.
    pub loaded: Vec<String>,
    /// Routines whose fingerprint found nothing changed.
    pub unchanged: Vec<String>,
    /// Failed routines with their reasons. The batch kept going.
    pub failed: Vec<(String, RoutineError)>,
    /// Metadata entries removed by pruning.
    pub pruned: Vec<String>,
}

impl BatchReport {
    /// True when no routine failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs the full load over every discovered routine source.
pub fn run_batch(
    config: &StrataConfig,
    provider: &dyn MetadataProvider,
    sink: &dyn ReportSink,
    options: &BatchOptions,
) -> Result<BatchReport, BatchError> {
    let sources = config.project.sources.as_deref().ok_or_else(|| {
        BatchError::Config(ConfigError::MissingSetting {
            setting: "project.sources".to_string(),
        })
    })?;
    let files = discover_sources(sources, config.project.effective_extension())?;
    info!(files = files.len(), "routine sources discovered");

    let store = MetadataStore::new(&config.project.effective_metadata());
    let mut routines = store.load()?;
    let registry = provider.routine_registry()?;
    let placeholders = config.placeholder_map();
    let loader = RoutineLoader::new(provider, &placeholders);

    let mut report = BatchReport::default();
    for path in &files {
        // Discovery only yields files with UTF-8 base names.
        let Some(name) = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_string)
        else {
            continue;
        };
        let prior = routines.get(&name).cloned();

        match loader.load(path, &name, prior.as_ref(), &registry) {
            Ok(outcome) if outcome.reloaded => {
                sink.info(&format!("Loaded {} '{}'.", outcome.metadata.kind, name));
                routines.insert(name.clone(), outcome.metadata);
                store.save(&routines)?;
                report.loaded.push(name);
            }
            Ok(_) => report.unchanged.push(name),
            Err(err) => {
                sink.error(&format!("Routine file '{}' failed: {err}", path.display()));
                warn!(file = %path.display(), error = %err, "routine failed");
                report.failed.push((name, err));
            }
        }
    }

    if options.prune {
        let live: BTreeSet<&str> = files
            .iter()
            .filter_map(|path| path.file_stem().and_then(|stem| stem.to_str()))
            .collect();
        let stale: Vec<String> = routines
            .keys()
            .filter(|name| !live.contains(name.as_str()))
            .cloned()
            .collect();
        for name in stale {
            routines.remove(&name);
            sink.info(&format!("Pruned metadata of routine '{name}'."));
            report.pruned.push(name);
        }
    }

    store.save(&routines)?;

    sink.info(&format!(
        "Routines: {} loaded, {} unchanged, {} failed.",
        report.loaded.len(),
        report.unchanged.len(),
        report.failed.len(),
    ));
    info!(
        loaded = report.loaded.len(),
        unchanged = report.unchanged.len(),
        failed = report.failed.len(),
        pruned = report.pruned.len(),
        "batch finished"
    );
    Ok(report)
}
