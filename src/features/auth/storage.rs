//! Durable key/value storage for the session: access token, refresh token
//! and the language preference. The file store survives between console
//! runs; the memory store is used for `--ephemeral` runs and tests.
//!
//! Token values are handed out as `SecretString` and must never be logged.

use crate::app_lib::AppError;
use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const LANGUAGE_KEY: &str = "language";

/// Key/value storage shared by the API client and the session store.
pub trait TokenStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    /// Returns `AppError::Storage` if the value cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// # Errors
    /// Returns `AppError::Storage` if the removal cannot be persisted.
    fn remove(&self, key: &str) -> Result<(), AppError>;

    fn access_token(&self) -> Option<SecretString> {
        self.get(ACCESS_TOKEN_KEY).map(SecretString::from)
    }

    fn refresh_token(&self) -> Option<SecretString> {
        self.get(REFRESH_TOKEN_KEY).map(SecretString::from)
    }

    /// # Errors
    /// Returns `AppError::Storage` if the token cannot be persisted.
    fn set_access_token(&self, token: &SecretString) -> Result<(), AppError> {
        self.set(ACCESS_TOKEN_KEY, token.expose_secret())
    }

    /// # Errors
    /// Returns `AppError::Storage` if the token cannot be persisted.
    fn set_refresh_token(&self, token: &SecretString) -> Result<(), AppError> {
        self.set(REFRESH_TOKEN_KEY, token.expose_secret())
    }

    /// # Errors
    /// Returns `AppError::Storage` if the removal cannot be persisted.
    fn remove_access_token(&self) -> Result<(), AppError> {
        self.remove(ACCESS_TOKEN_KEY)
    }

    /// # Errors
    /// Returns `AppError::Storage` if the removal cannot be persisted.
    fn remove_refresh_token(&self) -> Result<(), AppError> {
        self.remove(REFRESH_TOKEN_KEY)
    }

    /// Removes both tokens; the language preference is kept.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if the removal cannot be persisted.
    fn clear_tokens(&self) -> Result<(), AppError> {
        self.remove_access_token()?;
        self.remove_refresh_token()
    }
}

/// In-process storage; nothing outlives the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryTokenStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// JSON file storage. Every write replaces the file atomically and, on Unix,
/// restricts it to the owner.
#[derive(Debug)]
pub struct FileTokenStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileTokenStorage {
    /// Opens the store, reading existing entries. A missing, unreadable or
    /// corrupt file is treated as empty.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = read_entries(&path);
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), AppError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|err| {
            AppError::Storage(format!("Failed to create {}: {err}", dir.display()))
        })?;

        let payload = serde_json::to_vec_pretty(entries)
            .map_err(|err| AppError::Storage(format!("Failed to encode session: {err}")))?;

        // Created 0600 on Unix before any token is written.
        let mut tmp = NamedTempFile::new_in(dir).map_err(|err| {
            AppError::Storage(format!("Failed to create a file in {}: {err}", dir.display()))
        })?;
        tmp.write_all(&payload)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|err| {
                AppError::Storage(format!("Failed to write {}: {err}", tmp.path().display()))
            })?;
        tmp.persist(&self.path).map_err(|err| {
            AppError::Storage(format!("Failed to replace {}: {}", self.path.display(), err.error))
        })?;

        debug!(path = %self.path.display(), "session file written");
        Ok(())
    }

    /// Applies `apply` to a copy of the entries and keeps it only once it is
    /// on disk.
    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), AppError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = entries.clone();
        apply(&mut next);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}

impl TokenStorage for FileTokenStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        if self.get(key).is_none() {
            return Ok(());
        }
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

fn read_entries(path: &Path) -> BTreeMap<String, String> {
    match fs::read(path) {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|err| {
            warn!(path = %path.display(), "ignoring unreadable session file: {err}");
            BTreeMap::new()
        }),
        Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
        Err(err) => {
            warn!(path = %path.display(), "failed to read session file: {err}");
            BTreeMap::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trips_tokens() {
        let storage = MemoryTokenStorage::new();
        storage
            .set_access_token(&SecretString::from("access-1".to_string()))
            .unwrap();
        storage
            .set_refresh_token(&SecretString::from("refresh-1".to_string()))
            .unwrap();
        storage.set(LANGUAGE_KEY, "en").unwrap();

        assert_eq!(
            storage.access_token().map(|t| t.expose_secret().to_string()),
            Some("access-1".to_string())
        );

        storage.clear_tokens().unwrap();
        assert!(storage.access_token().is_none());
        assert!(storage.refresh_token().is_none());
        assert_eq!(storage.get(LANGUAGE_KEY).as_deref(), Some("en"));
    }

    #[test]
    fn file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let storage = FileTokenStorage::open(&path);
        storage
            .set_access_token(&SecretString::from("access-1".to_string()))
            .unwrap();
        storage
            .set_refresh_token(&SecretString::from("refresh-1".to_string()))
            .unwrap();

        let reopened = FileTokenStorage::open(&path);
        assert_eq!(
            reopened
                .refresh_token()
                .map(|t| t.expose_secret().to_string()),
            Some("refresh-1".to_string())
        );

        reopened.remove_access_token().unwrap();
        let again = FileTokenStorage::open(&path);
        assert!(again.access_token().is_none());
        assert!(again.refresh_token().is_some());
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, b"{not json").unwrap();

        let storage = FileTokenStorage::open(&path);
        assert!(storage.access_token().is_none());

        storage.set(LANGUAGE_KEY, "zh-TW").unwrap();
        assert_eq!(
            FileTokenStorage::open(&path).get(LANGUAGE_KEY).as_deref(),
            Some("zh-TW")
        );
    }

    #[test]
    fn removing_a_missing_key_does_not_create_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let storage = FileTokenStorage::open(&path);
        storage.clear_tokens().unwrap();

        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let storage = FileTokenStorage::open(&path);
        storage
            .set_access_token(&SecretString::from("access-1".to_string()))
            .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn rewrite_replaces_a_world_readable_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, b"{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let storage = FileTokenStorage::open(&path);
        storage
            .set_refresh_token(&SecretString::from("refresh-1".to_string()))
            .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("session.json")]);
    }

    #[test]
    fn failed_write_leaves_entries_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        // A directory in place of the file makes the final rename fail.
        fs::create_dir(&path).unwrap();

        let storage = FileTokenStorage::open(&path);
        let err = storage
            .set_access_token(&SecretString::from("access-1".to_string()))
            .unwrap_err();

        assert!(matches!(err, AppError::Storage(_)));
        assert!(storage.access_token().is_none());
    }
}
