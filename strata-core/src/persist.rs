//! Durable file writes.
//!
//! Generated artifacts and metadata are written through a temporary
//! sibling followed by a rename, so readers never observe a half
//! written file. `write_if_changed` additionally leaves identical
//! files untouched to keep their timestamps stable for downstream
//! build tools.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::errors::StoreError;

fn io_error(path: &Path, err: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

/// Writes `contents` to `path` via a temporary sibling and rename.
/// Creates missing parent directories.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| io_error(path, err))?;
        }
    }

    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = Path::new(&temp);

    fs::write(temp, contents).map_err(|err| io_error(temp, err))?;
    fs::rename(temp, path).map_err(|err| io_error(path, err))?;
    Ok(())
}

/// Writes `contents` to `path` unless the file already holds exactly
/// those bytes. Returns whether the file was rewritten.
pub fn write_if_changed(path: &Path, contents: &[u8]) -> Result<bool, StoreError> {
    match fs::read(path) {
        Ok(existing) if existing == contents => {
            debug!(path = %path.display(), "file unchanged, skipping write");
            return Ok(false);
        }
        Ok(_) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => return Err(io_error(path, err)),
    }

    write_atomic(path, contents)?;
    debug!(path = %path.display(), bytes = contents.len(), "file written");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_write_creates_parents_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/out.txt");

        write_atomic(&target, b"hello").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"hello");
        let siblings: Vec<_> = fs::read_dir(target.parent().unwrap())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(siblings, vec![std::ffi::OsString::from("out.txt")]);
    }

    #[test]
    fn unchanged_content_is_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");

        assert!(write_if_changed(&target, b"same").unwrap());
        let first = fs::metadata(&target).unwrap().modified().unwrap();

        assert!(!write_if_changed(&target, b"same").unwrap());
        let second = fs::metadata(&target).unwrap().modified().unwrap();
        assert_eq!(first, second);

        assert!(write_if_changed(&target, b"different").unwrap());
        assert_eq!(fs::read(&target).unwrap(), b"different");
    }
}
