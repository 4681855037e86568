//! Top-level configuration with loading and validation.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{
    ConstantsConfig, DatabaseConfig, ProjectConfig, WrapperConfig,
};
use crate::errors::ConfigError;
use crate::types::PlaceholderMap;

/// Complete configuration for one strata project.
///
/// Loaded from a single TOML file. Relative paths inside the file are
/// resolved against the directory containing it, so a project can be
/// driven from any working directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StrataConfig {
    pub project: ProjectConfig,
    pub database: DatabaseConfig,

    /// Placeholder values substituted into routine sources. Keys are
    /// matched case-insensitively at substitution time.
    pub placeholders: BTreeMap<String, String>,

    /// Optional constants synchronisation. Absent section disables it.
    pub constants: Option<ConstantsConfig>,

    /// Optional wrapper generation. Absent section disables it.
    pub wrapper: Option<WrapperConfig>,
}

impl StrataConfig {
    /// Loads and validates a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                });
            }
            Err(err) => {
                return Err(ConfigError::ParseError {
                    path: path.display().to_string(),
                    message: err.to_string(),
                });
            }
        };

        let mut config: StrataConfig =
            toml::from_str(&text).map_err(|err| ConfigError::ParseError {
                path: path.display().to_string(),
                message: err.to_string(),
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.resolve_paths(base);
        config.validate()?;

        debug!(
            config = %path.display(),
            dialect = config.project.effective_dialect(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Parses configuration from an in-memory TOML string. Paths are
    /// left as written and validation is still applied.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: StrataConfig =
            toml::from_str(text).map_err(|err| ConfigError::ParseError {
                path: "<inline>".to_string(),
                message: err.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Placeholder values as a lookup map with lowercased keys.
    pub fn placeholder_map(&self) -> PlaceholderMap {
        PlaceholderMap::from_pairs(
            self.placeholders
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        )
    }

    fn resolve_paths(&mut self, base: &Path) {
        self.project.resolve_paths(base);
        self.database.resolve_paths(base);
        if let Some(constants) = &mut self.constants {
            constants.resolve_paths(base);
        }
        if let Some(wrapper) = &mut self.wrapper {
            wrapper.resolve_paths(base);
        }
    }

    /// Checks required settings and setting shapes. Returns the first
    /// problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(dialect) = &self.project.dialect {
            if dialect.is_empty() {
                return Err(ConfigError::InvalidSetting {
                    setting: "project.dialect".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        if self.project.sources.is_none() {
            return Err(ConfigError::MissingSetting {
                setting: "project.sources".to_string(),
            });
        }
        if let Some(extension) = &self.project.extension {
            if extension.is_empty() || extension.starts_with('.') {
                return Err(ConfigError::InvalidSetting {
                    setting: "project.extension".to_string(),
                    message: "expected a bare extension such as `sql`".to_string(),
                });
            }
        }

        if let Some(constants) = &self.constants {
            for (setting, present) in [
                ("constants.registry", constants.registry.is_some()),
                ("constants.prefix", constants.prefix.is_some()),
                ("constants.module", constants.module.is_some()),
                ("constants.label_pattern", constants.label_pattern.is_some()),
            ] {
                if !present {
                    return Err(ConfigError::MissingSetting {
                        setting: setting.to_string(),
                    });
                }
            }
            // Surfaces a bad pattern at load time instead of mid-sync.
            constants.label_regex()?;
        }

        if let Some(wrapper) = &self.wrapper {
            if wrapper.module.is_none() {
                return Err(ConfigError::MissingSetting {
                    setting: "wrapper.module".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_gets_defaults() {
        let config = StrataConfig::from_toml(
            r#"
            [project]
            sources = "routines"
            "#,
        )
        .unwrap();

        assert_eq!(config.project.effective_dialect(), "sqlite");
        assert_eq!(config.project.effective_extension(), "sql");
        assert!(config.constants.is_none());
        assert!(config.wrapper.is_none());
    }

    #[test]
    fn missing_sources_is_rejected() {
        let err = StrataConfig::from_toml("[project]\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingSetting { ref setting }
            if setting == "project.sources"));
    }

    #[test]
    fn constants_section_requires_all_settings() {
        let err = StrataConfig::from_toml(
            r#"
            [project]
            sources = "routines"

            [constants]
            registry = "constants.txt"
            prefix = "LEN_"
            module = "src/constants.rs"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingSetting { ref setting }
            if setting == "constants.label_pattern"));
    }

    #[test]
    fn bad_label_pattern_is_rejected() {
        let err = StrataConfig::from_toml(
            r#"
            [project]
            sources = "routines"

            [constants]
            registry = "constants.txt"
            prefix = "LEN_"
            module = "src/constants.rs"
            label_pattern = "(["
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSetting { ref setting, .. }
            if setting == "constants.label_pattern"));
    }

    #[test]
    fn placeholders_are_exposed_case_insensitively() {
        let config = StrataConfig::from_toml(
            r#"
            [project]
            sources = "routines"

            [placeholders]
            "@schema@" = "app"
            "#,
        )
        .unwrap();

        let map = config.placeholder_map();
        assert_eq!(map.resolve("@SCHEMA@"), Some("app"));
    }
}
