//! Durable storage for the API credential.
//!
//! Thin wrapper over a JSON document in the platform config directory.
//! Validation is the caller's job; this adapter only reads and writes.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const STORE_FILE: &str = "credentials.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredCredentials {
    #[serde(default)]
    api_key: String,
}

/// File-backed store holding one value under the `api_key` key.
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Store under the platform config directory.
    pub fn open_default() -> Self {
        let base = directories::ProjectDirs::from("com.local", "Page Chat", "PageChat")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("./config"));
        Self {
            path: base.join(STORE_FILE),
        }
    }

    /// Store at an explicit path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read the persisted key. A missing or unreadable file reads as no key.
    pub fn get(&self) -> Option<String> {
        let content = fs::read_to_string(&self.path).ok()?;
        let stored: StoredCredentials = serde_json::from_str(&content).ok()?;
        if stored.api_key.is_empty() {
            None
        } else {
            Some(stored.api_key)
        }
    }

    /// Persist the key durably across panel sessions.
    pub fn set(&self, key: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let stored = StoredCredentials {
            api_key: key.to_string(),
        };
        let json = serde_json::to_string_pretty(&stored)?;
        fs::write(&self.path, json)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_as_no_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::with_path(dir.path().join("credentials.json"));
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_set_then_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::with_path(dir.path().join("credentials.json"));

        store.set("AIzaSyExampleExampleExampleExample123").unwrap();
        assert_eq!(
            store.get(),
            Some("AIzaSyExampleExampleExampleExample123".to_string())
        );
    }

    #[test]
    fn test_set_overwrites_previous_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::with_path(dir.path().join("credentials.json"));

        store.set("first-key-first-key-first-key-1").unwrap();
        store.set("second-key-second-key-second-key-2").unwrap();
        assert_eq!(
            store.get(),
            Some("second-key-second-key-second-key-2".to_string())
        );
    }

    #[test]
    fn test_corrupt_file_reads_as_no_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "not json").unwrap();

        let store = CredentialStore::with_path(path);
        assert_eq!(store.get(), None);
    }
}
