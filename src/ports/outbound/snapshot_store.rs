use crate::versioning::SnapshotDocument;
use crate::shared::Result;

/// SnapshotStore port for persisting version snapshots
///
/// This port abstracts where snapshots live (directory of JSON files,
/// in-memory store for tests, etc.). Version IDs are the storage keys.
pub trait SnapshotStore {
    /// Persists a snapshot under its version ID.
    ///
    /// # Errors
    /// Returns an error if a snapshot with the same version ID already
    /// exists, or if writing to the backing store fails. Snapshots are
    /// immutable once written.
    fn save(&self, snapshot: &SnapshotDocument) -> Result<()>;

    /// Loads the snapshot stored under `version_id`, or `None` if absent.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be read or the stored
    /// snapshot fails to parse.
    fn load(&self, version_id: &str) -> Result<Option<SnapshotDocument>>;

    /// All stored version IDs in ascending lexicographic order.
    ///
    /// IDs carry a zero-padded sequence prefix, so lexicographic order is
    /// creation order.
    fn list_ids(&self) -> Result<Vec<String>>;

    /// Deletes the snapshot stored under `version_id`.
    ///
    /// Returns `true` if a snapshot was deleted, `false` if none existed.
    fn delete(&self, version_id: &str) -> Result<bool>;
}
