//! File-based counter storage for Fydo.
//!
//! All counters live in one JSON document, by default
//! `~/.fydo/storage.json`. Writes go through a temp file + rename so a crash
//! mid-write leaves the previous document intact.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::default_storage_path;
use crate::error::{FydoError, Result};
use crate::storage::CounterStore;

/// Schema version of the storage document.
pub const STORAGE_SCHEMA_VERSION: u32 = 1;

/// One stored counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterEntry {
    pub value: u32,
    pub updated_at: DateTime<Utc>,
}

/// On-disk layout of the storage file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageDocument {
    pub version: u32,
    #[serde(default)]
    pub counters: BTreeMap<String, CounterEntry>,
}

impl Default for StorageDocument {
    fn default() -> Self {
        Self {
            version: STORAGE_SCHEMA_VERSION,
            counters: BTreeMap::new(),
        }
    }
}

/// File-based counter storage.
#[derive(Debug, Clone)]
pub struct FileCounterStore {
    /// Path of the JSON document.
    path: PathBuf,
}

impl FileCounterStore {
    /// Create a store at the default location.
    ///
    /// Uses `~/.fydo/storage.json` or `$FYDO_HOME/storage.json`.
    pub fn new() -> Result<Self> {
        let path = default_storage_path().ok_or_else(|| {
            FydoError::config("Could not determine storage path (no home directory)")
        })?;
        Self::with_path(path)
    }

    /// Create a store backed by a specific file.
    ///
    /// The parent directory is created if needed; the file itself is created
    /// on first write.
    pub fn with_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| FydoError::storage(parent, e))?;
            }
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Temp file used during atomic writes.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "storage.json".to_string());
        self.path.with_file_name(format!(".{}.tmp", name))
    }

    /// Load the whole document. A missing file is an empty document.
    fn load(&self) -> std::result::Result<StorageDocument, String> {
        if !self.path.exists() {
            return Ok(StorageDocument::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| e.to_string())?;
        if content.trim().is_empty() {
            return Ok(StorageDocument::default());
        }

        serde_json::from_str(&content).map_err(|e| e.to_string())
    }

    /// Write the whole document using temp file + rename.
    fn atomic_write(&self, document: &StorageDocument) -> std::io::Result<()> {
        let temp_path = self.temp_path();
        let json = serde_json::to_string_pretty(document)?;

        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }

        fs::rename(&temp_path, &self.path)
    }
}

impl CounterStore for FileCounterStore {
    fn read(&self, key: &str) -> Result<Option<u32>> {
        let document = self
            .load()
            .map_err(|message| FydoError::store_read(key, message))?;

        Ok(document.counters.get(key).map(|entry| entry.value))
    }

    fn write(&self, key: &str, value: u32) -> Result<()> {
        // A corrupt document is replaced rather than blocking the write
        let mut document = self.load().unwrap_or_else(|message| {
            tracing::warn!(
                path = %self.path.display(),
                error = %message,
                "storage file unreadable, starting a fresh document"
            );
            StorageDocument::default()
        });

        document.counters.insert(
            key.to_string(),
            CounterEntry {
                value,
                updated_at: Utc::now(),
            },
        );

        self.atomic_write(&document)
            .map_err(|e| FydoError::store_write(key, e.to_string()))
    }
}
