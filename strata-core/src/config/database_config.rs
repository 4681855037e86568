//! Database connection settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The `[database]` section of the configuration file.
///
/// Interpretation is dialect specific. The sqlite dialect reads `path`;
/// other dialects may ignore it entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file path for file-backed dialects.
    pub path: Option<PathBuf>,
}

impl DatabaseConfig {
    pub(crate) fn resolve_paths(&mut self, base: &Path) {
        if let Some(path) = &self.path {
            if path.is_relative() {
                self.path = Some(base.join(path));
            }
        }
    }
}
