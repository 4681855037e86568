//! Wrapper module generation.
//!
//! Walks the metadata store in name order and renders one calling
//! function per routine on top of a fixed runtime prelude. A routine
//! that cannot be rendered is reported and skipped; the module is still
//! written with every routine that succeeded.

pub mod generator;

use std::collections::BTreeMap;

use tracing::{info, warn};

use strata_core::config::WrapperConfig;
use strata_core::errors::{BatchError, ConfigError, RoutineError};
use strata_core::persist::write_if_changed;
use strata_core::report::ReportSink;
use strata_core::types::{RoutineMetadata, TypeTable};

use crate::wrapper::generator::{render_routine, MODULE_HEADER};

/// Outcome of one generation run.
#[derive(Debug, Default)]
pub struct WrapperReport {
    pub generated: Vec<String>,
    pub failed: Vec<(String, RoutineError)>,
    pub written: bool,
}

impl WrapperReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Generates the wrapper module for every routine in the store.
pub fn generate_wrappers(
    config: &WrapperConfig,
    routines: &BTreeMap<String, RoutineMetadata>,
    types: &TypeTable,
    sink: &dyn ReportSink,
) -> Result<WrapperReport, BatchError> {
    let module_path = config.module.as_deref().ok_or_else(|| {
        BatchError::Config(ConfigError::MissingSetting {
            setting: "wrapper.module".to_string(),
        })
    })?;

    let mut report = WrapperReport::default();
    let mut text = String::from(MODULE_HEADER);
    for (name, metadata) in routines {
        match render_routine(metadata, types, config.lob_as_string) {
            Ok(code) => {
                text.push('\n');
                text.push_str(&code);
                report.generated.push(name.clone());
            }
            Err(err) => {
                sink.error(&format!("Wrapper for routine '{name}' failed: {err}"));
                warn!(routine = %name, error = %err, "wrapper generation failed");
                report.failed.push((name.clone(), err.into()));
            }
        }
    }

    report.written = write_if_changed(module_path, text.as_bytes())?;

    sink.info(&format!(
        "Wrappers: {} generated, {} failed.",
        report.generated.len(),
        report.failed.len()
    ));
    info!(
        generated = report.generated.len(),
        failed = report.failed.len(),
        written = report.written,
        "wrapper module generated"
    );
    Ok(report)
}
