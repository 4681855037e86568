//! Wrapper generation settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The `[wrapper]` section of the configuration file. Presence of the
/// section enables wrapper generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WrapperConfig {
    /// Path of the generated wrapper module.
    pub module: Option<PathBuf>,

    /// When true, large-object parameters are treated as ordinary text
    /// and no separate LOB code path is emitted.
    pub lob_as_string: bool,
}

impl WrapperConfig {
    pub(crate) fn resolve_paths(&mut self, base: &Path) {
        if let Some(module) = &self.module {
            if module.is_relative() {
                self.module = Some(base.join(module));
            }
        }
    }
}
