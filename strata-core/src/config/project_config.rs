//! Project-level settings: dialect, source tree, metadata location.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The `[project]` section of the configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Database dialect tag. Defaults to `sqlite`.
    pub dialect: Option<String>,

    /// Directory scanned recursively for routine source files. Required.
    pub sources: Option<PathBuf>,

    /// File extension of routine sources, without the leading dot.
    /// Defaults to `sql`.
    pub extension: Option<String>,

    /// Path of the metadata file. Defaults to `.strata/metadata.json`.
    pub metadata: Option<PathBuf>,
}

impl ProjectConfig {
    pub fn effective_dialect(&self) -> &str {
        self.dialect.as_deref().unwrap_or("sqlite")
    }

    pub fn effective_extension(&self) -> &str {
        self.extension.as_deref().unwrap_or("sql")
    }

    pub fn effective_metadata(&self) -> PathBuf {
        self.metadata
            .clone()
            .unwrap_or_else(|| PathBuf::from(".strata/metadata.json"))
    }

    pub(crate) fn resolve_paths(&mut self, base: &Path) {
        if let Some(sources) = &self.sources {
            if sources.is_relative() {
                self.sources = Some(base.join(sources));
            }
        }
        if let Some(metadata) = &self.metadata {
            if metadata.is_relative() {
                self.metadata = Some(base.join(metadata));
            }
        }
    }
}
