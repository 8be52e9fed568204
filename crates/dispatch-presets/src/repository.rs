//! JSON file storage for presets.
//!
//! The whole collection is stored as one pretty-printed JSON array. Writes go
//! to a temp file that is renamed over the target, so a crash never leaves a
//! half-written preset list behind.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{PresetError, Result};
use crate::store::PresetStore;

/// File-backed preset collection.
#[derive(Debug, Clone)]
pub struct PresetRepository {
    path: PathBuf,
}

impl PresetRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored presets. A missing file is an empty collection.
    pub fn load(&self) -> Result<PresetStore> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no presets file yet");
            return Ok(PresetStore::new());
        }
        let bytes = fs::read(&self.path).map_err(|e| PresetError::Io {
            operation: "read",
            path: self.path.clone(),
            source: e,
        })?;
        let store: PresetStore =
            serde_json::from_slice(&bytes).map_err(|e| PresetError::InvalidFormat {
                path: self.path.clone(),
                source: e,
            })?;
        tracing::debug!(path = %self.path.display(), presets = store.len(), "loaded presets");
        Ok(store)
    }

    /// Writes the collection atomically.
    pub fn save(&self, store: &PresetStore) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(store)
            .map_err(|e| PresetError::Serialization { source: e })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PresetError::Io {
                operation: "create directory for",
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let replaced = write_synced(&temp_path, &bytes).and_then(|()| {
            fs::rename(&temp_path, &self.path).map_err(|e| PresetError::Io {
                operation: "replace",
                path: self.path.clone(),
                source: e,
            })
        });
        if let Err(error) = replaced {
            if let Err(cleanup) = fs::remove_file(&temp_path)
                && cleanup.kind() != std::io::ErrorKind::NotFound
            {
                tracing::warn!(
                    path = %temp_path.display(),
                    error = %cleanup,
                    "temp file left behind"
                );
            }
            return Err(error);
        }

        tracing::info!(path = %self.path.display(), presets = store.len(), "saved presets");
        Ok(())
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> Result<()> {
    let io_error = |operation: &'static str| {
        move |e: std::io::Error| PresetError::Io {
            operation,
            path: path.to_path_buf(),
            source: e,
        }
    };
    let mut file = File::create(path).map_err(io_error("create"))?;
    file.write_all(bytes).map_err(io_error("write"))?;
    file.sync_all().map_err(io_error("sync"))
}
