//! Cache Store
//!
//! Reads and writes per-server command caches.
//!
//! ## Guarantees
//! - `load` never fails: anything unusable is reported as "no cache"
//! - `save` is atomic: a temp file is written, synced, then renamed over
//!   the old cache, so a crash never leaves a truncated file behind

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{RconError, Result};
use crate::model::{CommandModel, MODEL_VERSION};

use super::entry::{CacheEntry, VersionHeader};
use super::ServerKey;

/// Directory of cache files, one per server
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    /// Use `dir` for cache files; it is created on first save
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load a server's cached model
    ///
    /// Returns `None` when the file is absent, unreadable, malformed, or
    /// written under a different model version.
    pub fn load(&self, key: &ServerKey) -> Option<CommandModel> {
        let path = self.path_for(key);

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!("No usable cache at {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<VersionHeader>(&raw) {
            Ok(header) if header.version == MODEL_VERSION => {}
            Ok(header) => {
                tracing::debug!(
                    "Cache version mismatch in {}: found {}, expected {}",
                    path.display(),
                    header.version,
                    MODEL_VERSION
                );
                return None;
            }
            Err(e) => {
                tracing::debug!("Corrupt cache file {}: {}", path.display(), e);
                return None;
            }
        }

        match serde_json::from_str::<CacheEntry>(&raw) {
            Ok(entry) => {
                let model = CommandModel::from(entry);
                tracing::debug!("Loaded {} commands from cache {}", model.len(), path.display());
                Some(model)
            }
            Err(e) => {
                tracing::debug!("Corrupt cache file {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Write a server's model, replacing any previous cache atomically
    pub fn save(&self, key: &ServerKey, model: &CommandModel) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            RconError::Cache(format!("Cannot create {}: {}", self.dir.display(), e))
        })?;

        let path = self.path_for(key);
        let temp_path = Self::temp_path(&path);

        let json = serde_json::to_vec(&CacheEntry::from(model))
            .map_err(|e| RconError::Cache(format!("Cannot serialize cache: {}", e)))?;

        let written = Self::write_synced(&temp_path, &json).and_then(|_| fs::rename(&temp_path, &path));
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(RconError::Cache(format!(
                "Cannot write {}: {}",
                path.display(),
                e
            )));
        }

        tracing::debug!("Saved {} commands to cache {}", model.len(), path.display());
        Ok(())
    }

    /// Remove a server's cache; a missing file is not an error
    pub fn remove(&self, key: &ServerKey) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RconError::Cache(e.to_string())),
        }
    }

    /// Cache file path for a server
    pub fn path_for(&self, key: &ServerKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Cache directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// "x_25575.json" → "x_25575.json.tmp", same directory so rename is atomic
    fn temp_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        path.with_file_name(name)
    }

    fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(bytes)?;
        file.sync_all()
    }
}
