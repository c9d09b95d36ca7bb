//! Durable key-value storage.
//!
//! All persisted state lives in a flat namespace of keys, each holding one
//! independently serialized JSON value. Reads and writes are synchronous and
//! whole-value: there are no partial updates and no rollback across keys.

use crate::constants;
use crate::errors::{AppError, AppResult, LockError, StorageError};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// The persistence seam: a flat map from keys to serialized values.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&mut self, key: &str) -> AppResult<()>;
}

/// Reads and deserializes the value stored under `key`.
///
/// A missing key yields `None`. A value that fails to parse is logged and
/// also treated as absent, so a damaged file degrades to defaults instead of
/// preventing the journal from opening.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> AppResult<Option<T>> {
    let raw = match store.get(key)? {
        Some(raw) => raw,
        None => return Ok(None),
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!("Ignoring malformed stored value for '{}': {}", key, e);
            Ok(None)
        }
    }
}

/// Serializes `value` and stores it under `key`, replacing any previous value.
pub fn store_json<T: Serialize + ?Sized>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> AppResult<()> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}

fn validate_key(key: &str) -> AppResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()).into())
    }
}

/// Ensures the data directory exists, creating it with owner-only permissions.
///
/// # Errors
///
/// Returns:
/// - `AppError::Config` if the provided path is not absolute
/// - `AppError::Io` if the directory cannot be created
pub fn ensure_data_directory_exists(data_dir: &Path) -> AppResult<()> {
    if !data_dir.is_absolute() {
        return Err(AppError::Config(format!(
            "Data directory path must be absolute: {}",
            data_dir.display()
        )));
    }

    if !data_dir.exists() {
        fs::create_dir_all(data_dir).map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create data directory: {}", e),
            ))
        })?;

        #[cfg(unix)]
        {
            let permissions = fs::Permissions::from_mode(constants::DEFAULT_DIR_PERMISSIONS);
            fs::set_permissions(data_dir, permissions)?;
            debug!("Set 0o700 permissions on data directory");
        }
    }
    Ok(())
}

/// Stores each key as `<key>.json` inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens (and creates if needed) a file-backed store rooted at `dir`.
    pub fn open(dir: &Path) -> AppResult<Self> {
        ensure_data_directory_exists(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, key: &str) -> AppResult<PathBuf> {
        validate_key(key)?;
        Ok(self
            .dir
            .join(format!("{}.{}", key, constants::STORE_FILE_EXTENSION)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> AppResult<()> {
        let path = self.path_for(key)?;

        // Write to a sibling temp file and rename over the target so a reader
        // never observes a half-written value.
        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(value.as_bytes())?;
        temp.as_file().sync_all()?;

        #[cfg(unix)]
        {
            let permissions = fs::Permissions::from_mode(constants::DEFAULT_FILE_PERMISSIONS);
            temp.as_file().set_permissions(permissions)?;
        }

        temp.persist(&path).map_err(|e| AppError::Io(e.error))?;
        debug!("Stored {} bytes under '{}'", value.len(), key);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store, used by tests and as a scratch store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        validate_key(key)?;
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> AppResult<()> {
        validate_key(key)?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> AppResult<()> {
        validate_key(key)?;
        self.values.remove(key);
        Ok(())
    }
}

/// An exclusive advisory lock on a data directory, held for the lifetime of
/// an interactive session. Released on drop.
#[derive(Debug)]
pub struct SessionLock {
    file: File,
    path: PathBuf,
}

impl SessionLock {
    /// Tries to take the lock without blocking.
    ///
    /// # Errors
    ///
    /// Returns `LockError::FileBusy` if another process holds the lock, or
    /// `LockError::AcquisitionFailed` if the lock file cannot be opened.
    pub fn acquire(data_dir: &Path) -> AppResult<Self> {
        let path = data_dir.join(constants::SESSION_LOCK_FILE);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| LockError::AcquisitionFailed {
                path: path.clone(),
                source,
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                debug!("Acquired session lock {:?}", path);
                Ok(Self { file, path })
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => {
                Err(LockError::FileBusy { path }.into())
            }
            Err(source) => Err(LockError::AcquisitionFailed { path, source }.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!("Failed to release session lock {:?}: {}", self.path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_file_store_roundtrip_and_remove() -> AppResult<()> {
        let temp_dir = tempdir()?;
        let mut store = FileStore::open(temp_dir.path())?;

        assert_eq!(store.get("colorHue")?, None);
        store.set("colorHue", "174")?;
        assert_eq!(store.get("colorHue")?, Some("174".to_string()));
        assert!(temp_dir.path().join("colorHue.json").exists());

        store.set("colorHue", "220")?;
        assert_eq!(store.get("colorHue")?, Some("220".to_string()));

        store.remove("colorHue")?;
        assert_eq!(store.get("colorHue")?, None);
        // Removing twice is fine
        store.remove("colorHue")?;
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_permissions() -> AppResult<()> {
        let temp_dir = tempdir()?;
        let data_dir = temp_dir.path().join("data");
        let mut store = FileStore::open(&data_dir)?;
        store.set("journalPassword", "\"secret\"")?;

        let dir_mode = fs::metadata(&data_dir)?.permissions().mode() & 0o777;
        assert_eq!(dir_mode, 0o700);
        let file_mode = fs::metadata(data_dir.join("journalPassword.json"))?
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(file_mode, 0o600);
        Ok(())
    }

    #[test]
    fn test_relative_data_dir_rejected() {
        let result = FileStore::open(Path::new("relative/dir"));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_invalid_keys_rejected() {
        let mut store = MemoryStore::new();
        assert!(store.set("../escape", "1").is_err());
        assert!(store.set("", "1").is_err());
        assert!(store.get("a b").is_err());
        assert!(store.set("bg_Hue-2", "1").is_ok());
    }

    #[test]
    fn test_json_helpers() -> AppResult<()> {
        let mut store = MemoryStore::new();
        let sample = Sample {
            name: "alpha".to_string(),
            count: 3,
        };
        store_json(&mut store, "sample", &sample)?;
        let loaded: Option<Sample> = load_json(&store, "sample")?;
        assert_eq!(loaded, Some(sample));

        let missing: Option<Sample> = load_json(&store, "missing")?;
        assert!(missing.is_none());
        Ok(())
    }

    #[test]
    fn test_malformed_value_treated_as_absent() -> AppResult<()> {
        let mut store = MemoryStore::new();
        store.set("sample", "{not json")?;
        let loaded: Option<Sample> = load_json(&store, "sample")?;
        assert!(loaded.is_none());
        Ok(())
    }

    #[test]
    fn test_session_lock_is_exclusive() -> AppResult<()> {
        let temp_dir = tempdir()?;
        let first = SessionLock::acquire(temp_dir.path())?;

        let second = SessionLock::acquire(temp_dir.path());
        assert!(matches!(
            second,
            Err(AppError::Lock(LockError::FileBusy { .. }))
        ));

        drop(first);
        let third = SessionLock::acquire(temp_dir.path())?;
        assert!(third.path().ends_with(".daybook.lock"));
        Ok(())
    }
}
