//! Constants synchronization.
//!
//! Reconciles the editable registry file with the live schema, then renders
//! the constants module: one `pub const` per width-bearing column plus one
//! per label row. The registry round-trips custom symbols; the module is
//! rewritten only when its content changes.

pub mod merge;
pub mod module;
pub mod registry;

use std::fs;
use std::io::ErrorKind;

use tracing::info;

use strata_core::config::ConstantsConfig;
use strata_core::errors::{BatchError, ConfigError, StoreError};
use strata_core::persist::write_if_changed;
use strata_core::report::ReportSink;
use strata_core::traits::MetadataProvider;
use strata_core::types::ConstantEntry;

use crate::constants::merge::merge_columns;
use crate::constants::module::render_module;
use crate::constants::registry::{parse_registry, render_registry, RegistryColumn};

/// Outcome of one synchronization run.
#[derive(Debug, Default)]
pub struct ConstantsReport {
    pub width_constants: usize,
    pub label_constants: usize,
    pub registry_written: bool,
    pub module_written: bool,
}

fn missing_setting(setting: &str) -> BatchError {
    BatchError::Config(ConfigError::MissingSetting {
        setting: setting.to_string(),
    })
}

fn read_registry_file(path: &std::path::Path) -> Result<Vec<RegistryColumn>, BatchError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(parse_registry(&text)?),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(StoreError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
        .into()),
    }
}

/// Synchronizes the registry and constants module against the current
/// schema. Any duplicate symbol aborts before either file is touched.
pub fn synchronize_constants(
    config: &ConstantsConfig,
    provider: &dyn MetadataProvider,
    sink: &dyn ReportSink,
) -> Result<ConstantsReport, BatchError> {
    let registry_path = config
        .registry
        .as_deref()
        .ok_or_else(|| missing_setting("constants.registry"))?;
    let module_path = config
        .module
        .as_deref()
        .ok_or_else(|| missing_setting("constants.module"))?;
    let prefix = config
        .prefix
        .as_deref()
        .ok_or_else(|| missing_setting("constants.prefix"))?;
    let label_pattern = config.label_regex()?;

    let old = read_registry_file(registry_path)?;
    let schema_columns = provider.introspect_schema_columns()?;
    let mut entries = merge_columns(prefix, &old, &schema_columns);
    let width_constants = entries.len();

    let labels = provider.introspect_labels(&label_pattern)?;
    entries.extend(labels.into_iter().map(|label| ConstantEntry {
        table: label.table,
        column: label.column,
        value: label.value,
        symbol: label.symbol,
    }));
    let label_constants = entries.len() - width_constants;

    // Render first so a symbol clash leaves both files untouched.
    let module_text = render_module(&entries)?;
    let registry_text = render_registry(&entries[..width_constants]);

    let registry_written = write_if_changed(registry_path, registry_text.as_bytes())?;
    let module_written = write_if_changed(module_path, module_text.as_bytes())?;

    sink.info(&format!(
        "Number of constants based on column widths: {width_constants}"
    ));
    sink.info(&format!(
        "Number of constants based on database IDs: {label_constants}"
    ));
    info!(
        width_constants,
        label_constants, module_written, "constants synchronized"
    );

    Ok(ConstantsReport {
        width_constants,
        label_constants,
        registry_written,
        module_written,
    })
}
