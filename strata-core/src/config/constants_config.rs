//! Constants registry settings.

use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// The `[constants]` section of the configuration file. Presence of the
/// section enables constants synchronisation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstantsConfig {
    /// Path of the editable registry file.
    pub registry: Option<PathBuf>,

    /// Prefix prepended to derived constant symbols, e.g. `LEN_`.
    pub prefix: Option<String>,

    /// Path of the generated constants module.
    pub module: Option<PathBuf>,

    /// Regex matching names of label columns, e.g. `^[a-z_]+_label$`.
    pub label_pattern: Option<String>,
}

impl ConstantsConfig {
    /// Compiles the label column pattern. Validation guarantees the
    /// pattern is present and well formed by the time this is called.
    pub fn label_regex(&self) -> Result<Regex, ConfigError> {
        let pattern =
            self.label_pattern
                .as_deref()
                .ok_or_else(|| ConfigError::MissingSetting {
                    setting: "constants.label_pattern".to_string(),
                })?;
        Regex::new(pattern).map_err(|err| ConfigError::InvalidSetting {
            setting: "constants.label_pattern".to_string(),
            message: err.to_string(),
        })
    }

    pub(crate) fn resolve_paths(&mut self, base: &Path) {
        if let Some(registry) = &self.registry {
            if registry.is_relative() {
                self.registry = Some(base.join(registry));
            }
        }
        if let Some(module) = &self.module {
            if module.is_relative() {
                self.module = Some(base.join(module));
            }
        }
    }
}
