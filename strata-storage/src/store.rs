//! The JSON metadata store.
//!
//! One file maps routine names to their persisted records. A missing
//! file reads as an empty store so first runs need no setup. Writes go
//! through the atomic persist helpers, and identical content leaves
//! the file untouched.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use strata_core::errors::StoreError;
use strata_core::persist::write_if_changed;
use strata_core::types::RoutineMetadata;
use tracing::debug;

/// File-backed map from routine name to metadata record.
pub struct MetadataStore {
    path: PathBuf,
}

impl MetadataStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the full store. A missing file is an empty store.
    pub fn load(&self) -> Result<BTreeMap<String, RoutineMetadata>, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no metadata store yet");
                return Ok(BTreeMap::new());
            }
            Err(err) => {
                return Err(StoreError::Io {
                    path: self.path.display().to_string(),
                    message: err.to_string(),
                });
            }
        };

        let routines: BTreeMap<String, RoutineMetadata> = serde_json::from_str(&text)
            .map_err(|err| StoreError::Deserialize {
                path: self.path.display().to_string(),
                message: err.to_string(),
            })?;
        debug!(
            path = %self.path.display(),
            routines = routines.len(),
            "metadata store loaded"
        );
        Ok(routines)
    }

    /// Writes the full store as pretty-printed JSON. Skips the write
    /// when the serialized content is unchanged.
    pub fn save(
        &self,
        routines: &BTreeMap<String, RoutineMetadata>,
    ) -> Result<(), StoreError> {
        let mut contents =
            serde_json::to_vec_pretty(routines).map_err(|err| StoreError::Serialize {
                message: err.to_string(),
            })?;
        contents.push(b'\n');
        write_if_changed(&self.path, &contents)?;
        Ok(())
    }
}
