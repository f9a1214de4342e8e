use std::fs;
use std::path::{Path, PathBuf};

use crate::ports::outbound::SnapshotStore;
use crate::shared::error::BomError;
use crate::shared::Result;
use crate::versioning::SnapshotDocument;

/// DirectorySnapshotStore adapter persisting snapshots as JSON files
///
/// Each snapshot lives in `{version_id}.json` under the store directory.
/// The directory is created on first save; listing an absent directory
/// yields an empty history rather than an error.
pub struct DirectorySnapshotStore {
    directory: PathBuf,
}

impl DirectorySnapshotStore {
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn snapshot_path(&self, version_id: &str) -> PathBuf {
        self.directory.join(format!("{}.json", version_id))
    }

    fn storage_error(version_id: &str, details: impl Into<String>) -> BomError {
        BomError::Storage {
            key: version_id.to_string(),
            details: details.into(),
        }
    }
}

impl SnapshotStore for DirectorySnapshotStore {
    fn save(&self, snapshot: &SnapshotDocument) -> Result<()> {
        fs::create_dir_all(&self.directory).map_err(|e| {
            Self::storage_error(&snapshot.version_id, format!("Failed to create snapshot directory: {}", e))
        })?;

        let path = self.snapshot_path(&snapshot.version_id);
        if path.exists() {
            return Err(Self::storage_error(
                &snapshot.version_id,
                "Snapshot already exists; snapshots are immutable",
            )
            .into());
        }

        let json = serde_json::to_string_pretty(snapshot).map_err(|e| {
            Self::storage_error(&snapshot.version_id, format!("Failed to serialize snapshot: {}", e))
        })?;
        fs::write(&path, json).map_err(|e| BomError::FileWriteError {
            path,
            details: e.to_string(),
        })?;
        Ok(())
    }

    fn load(&self, version_id: &str) -> Result<Option<SnapshotDocument>> {
        let path = self.snapshot_path(version_id);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path).map_err(|e| BomError::FileReadError {
            path: path.clone(),
            details: e.to_string(),
        })?;
        let snapshot = serde_json::from_str(&json).map_err(|e| BomError::DocumentParseError {
            path,
            details: e.to_string(),
        })?;
        Ok(Some(snapshot))
    }

    fn list_ids(&self) -> Result<Vec<String>> {
        if !self.directory.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.directory).map_err(|e| {
            Self::storage_error("<list>", format!("Failed to read snapshot directory: {}", e))
        })?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                Self::storage_error("<list>", format!("Failed to read directory entry: {}", e))
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn delete(&self, version_id: &str) -> Result<bool> {
        let path = self.snapshot_path(version_id);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).map_err(|e| {
            Self::storage_error(version_id, format!("Failed to delete snapshot: {}", e))
        })?;
        Ok(true)
    }
}
