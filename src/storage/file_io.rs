//! File I/O utilities with atomic writes
//!
//! Settings and the session credential are small JSON documents. They are
//! written through a temp file and renamed into place, so a reader sees either
//! the previous document or the new one.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::FinGridError;

/// Read JSON from a file, returning an error if the file doesn't exist
pub fn read_json_required<T, P>(path: P) -> Result<T, FinGridError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let file = File::open(path)
        .map_err(|e| FinGridError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| FinGridError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Read JSON from a file, returning `None` if the file doesn't exist
pub fn read_json_optional<T, P>(path: P) -> Result<Option<T>, FinGridError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    read_json_required(path).map(Some)
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), FinGridError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    write_atomic(path.as_ref(), data, false)
}

/// Write JSON atomically with owner-only permissions (0600 on Unix)
pub fn write_private_json_atomic<T, P>(path: P, data: &T) -> Result<(), FinGridError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    write_atomic(path.as_ref(), data, true)
}

/// Remove a file; a file that is already gone counts as removed
pub fn remove_if_exists<P: AsRef<Path>>(path: P) -> Result<(), FinGridError> {
    let path = path.as_ref();
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(FinGridError::Storage(format!(
            "Failed to remove {}: {}",
            path.display(),
            e
        ))),
    }
}

fn write_atomic<T: Serialize>(path: &Path, data: &T, private: bool) -> Result<(), FinGridError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            FinGridError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file must live in the same directory for the rename to be atomic
    let temp_path = path.with_extension("json.tmp");

    let file = open_for_write(&temp_path, private)
        .map_err(|e| FinGridError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| FinGridError::Storage(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| FinGridError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| FinGridError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        FinGridError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

#[cfg(unix)]
fn open_for_write(path: &Path, private: bool) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    if private {
        options.mode(0o600);
    }
    options.open(path)
}

#[cfg(not(unix))]
fn open_for_write(path: &Path, _private: bool) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Entry {
        name: String,
        value: i32,
    }

    fn entry() -> Entry {
        Entry {
            name: "credential".to_string(),
            value: 42,
        }
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("entry.json");

        write_json_atomic(&path, &entry()).unwrap();

        let loaded: Entry = read_json_required(&path).unwrap();
        assert_eq!(loaded, entry());
        assert!(!temp_dir.path().join("entry.json.tmp").exists());
    }

    #[test]
    fn test_optional_read_of_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let loaded: Option<Entry> = read_json_optional(temp_dir.path().join("none.json")).unwrap();
        assert!(loaded.is_none());
        assert!(read_json_required::<Entry, _>(temp_dir.path().join("none.json")).is_err());
    }

    #[test]
    fn test_corrupt_file_is_a_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, "not json at all").unwrap();

        let result = read_json_optional::<Entry, _>(&path);
        assert!(matches!(result, Err(FinGridError::Storage(_))));
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("entry.json");

        write_json_atomic(&path, &entry()).unwrap();
        assert!(path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_private_write_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        write_private_json_atomic(&path, &entry()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_remove_if_exists_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("entry.json");
        write_json_atomic(&path, &entry()).unwrap();

        remove_if_exists(&path).unwrap();
        assert!(!path.exists());
        remove_if_exists(&path).unwrap();
    }
}
