//! Routine source discovery.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use strata_core::errors::BatchError;
use tracing::debug;

/// Walks `root` for routine sources with the configured extension.
///
/// Hidden files and anything matched by ignore files are skipped. The
/// result is sorted by routine name; two files sharing a base name would
/// silently shadow each other, so that is a fatal error.
pub fn discover_sources(root: &Path, extension: &str) -> Result<Vec<PathBuf>, BatchError> {
    let mut by_name: BTreeMap<String, PathBuf> = BTreeMap::new();

    for entry in WalkBuilder::new(root).build() {
        let entry = entry.map_err(|err| BatchError::Discovery {
            path: root.display().to_string(),
            message: err.to_string(),
        })?;
        if !entry.file_type().is_some_and(|kind| kind.is_file()) {
            continue;
        }
        let path = entry.into_path();
        if path.extension().and_then(OsStr::to_str) != Some(extension) {
            continue;
        }
        let Some(name) = path
            .file_stem()
            .and_then(OsStr::to_str)
            .map(str::to_string)
        else {
            continue;
        };

        if let Some(first) = by_name.get(&name) {
            return Err(BatchError::DuplicateSource {
                name,
                first: first.display().to_string(),
                second: path.display().to_string(),
            });
        }
        by_name.insert(name, path);
    }

    debug!(root = %root.display(), sources = by_name.len(), "sources discovered");
    Ok(by_name.into_values().collect())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn finds_sources_recursively_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("b_routine.sql"), "x").unwrap();
        fs::write(dir.path().join("sub/a_routine.sql"), "x").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let sources = discover_sources(dir.path(), "sql").unwrap();
        let names: Vec<_> = sources
            .iter()
            .map(|p| p.file_stem().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a_routine", "b_routine"]);
    }

    #[test]
    fn duplicate_base_names_are_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("add_user.sql"), "x").unwrap();
        fs::write(dir.path().join("sub/add_user.sql"), "x").unwrap();

        let err = discover_sources(dir.path(), "sql").unwrap_err();
        assert!(matches!(
            err,
            BatchError::DuplicateSource { ref name, .. } if name == "add_user"
        ));
    }

    #[test]
    fn missing_root_is_a_discovery_error() {
        let err = discover_sources(Path::new("/nonexistent/routines"), "sql").unwrap_err();
        assert!(matches!(err, BatchError::Discovery { .. }));
    }
}
