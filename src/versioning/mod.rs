//! Version control over BOM snapshots: create, list, diff, restore, and
//! clean up immutable point-in-time copies of the inventory.

pub mod diff;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::inventory::domain::{Bom, BomDocument};
use crate::ports::outbound::SnapshotStore;
use crate::shared::{BomError, Result};

pub use diff::{diff_documents, FieldChange, ModifiedAsset, VersionDiff};

/// One immutable snapshot: the full BOM document plus capture metadata.
///
/// `asset_count` and `total_cost` are denormalized so history listings do
/// not need to materialize every snapshot's asset list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub version_id: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub user: String,
    pub asset_count: usize,
    pub total_cost: f64,
    pub bom: BomDocument,
}

/// Version-control service over a snapshot store.
///
/// Version IDs have the form `v{seq:04}-{YYYYMMDDThhmmss}`: the zero-padded
/// sequence makes IDs strictly monotonic (and lexicographically ordered)
/// even when several snapshots land within the same second.
pub struct VersionControl<S: SnapshotStore> {
    store: S,
}

impl<S: SnapshotStore> VersionControl<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Captures the current BOM state as a new immutable snapshot.
    ///
    /// # Errors
    /// Returns an error if the snapshot store cannot be listed or written.
    pub fn create_version(&self, bom: &Bom, message: &str, user: &str) -> Result<SnapshotDocument> {
        let timestamp = Utc::now();
        let snapshot = SnapshotDocument {
            version_id: self.next_version_id(timestamp)?,
            timestamp,
            message: message.to_string(),
            user: user.to_string(),
            asset_count: bom.len(),
            total_cost: bom.total_cost(),
            bom: bom.to_document(),
        };
        self.store.save(&snapshot)?;
        Ok(snapshot)
    }

    fn next_version_id(&self, timestamp: DateTime<Utc>) -> Result<String> {
        let next_seq = self
            .store
            .list_ids()?
            .iter()
            .filter_map(|id| parse_sequence(id))
            .max()
            .unwrap_or(0)
            + 1;
        Ok(format!(
            "v{:04}-{}",
            next_seq,
            timestamp.format("%Y%m%dT%H%M%S")
        ))
    }

    /// All snapshots in creation order, oldest first.
    pub fn history(&self) -> Result<Vec<SnapshotDocument>> {
        self.store
            .list_ids()?
            .iter()
            .map(|id| self.load_version(id))
            .collect()
    }

    /// Loads one snapshot by version ID.
    ///
    /// # Errors
    /// Returns `BomError::VersionNotFound` if no snapshot has that ID.
    pub fn load_version(&self, version_id: &str) -> Result<SnapshotDocument> {
        self.store
            .load(version_id)?
            .ok_or_else(|| {
                BomError::VersionNotFound {
                    version_id: version_id.to_string(),
                }
                .into()
            })
    }

    /// Differences from snapshot `from_id` to snapshot `to_id`.
    ///
    /// # Errors
    /// Returns `BomError::VersionNotFound` if either version is missing.
    pub fn diff(&self, from_id: &str, to_id: &str) -> Result<VersionDiff> {
        let from = self.load_version(from_id)?;
        let to = self.load_version(to_id)?;
        diff_documents(from_id, to_id, &from.bom, &to.bom)
    }

    /// Reconstructs the full BOM recorded in a snapshot, including assets
    /// later removed and the audit log as of capture time.
    ///
    /// # Errors
    /// Returns `BomError::VersionNotFound` if the version is missing, or a
    /// validation error if the stored document is malformed.
    pub fn restore(&self, version_id: &str) -> Result<Bom> {
        let snapshot = self.load_version(version_id)?;
        Bom::from_document(snapshot.bom)
    }

    /// Deletes all but the `keep` most recent snapshots, returning the
    /// deleted version IDs oldest first. `keep` of zero clears the store.
    pub fn cleanup(&self, keep: usize) -> Result<Vec<String>> {
        let ids = self.store.list_ids()?;
        let cut = ids.len().saturating_sub(keep);
        let mut deleted = Vec::with_capacity(cut);
        for id in &ids[..cut] {
            if self.store.delete(id)? {
                deleted.push(id.clone());
            }
        }
        Ok(deleted)
    }
}

fn parse_sequence(version_id: &str) -> Option<u64> {
    version_id
        .strip_prefix('v')?
        .split('-')
        .next()?
        .parse()
        .ok()
}
