use std::cell::RefCell;
use std::collections::BTreeMap;

use cbom::prelude::*;

/// Mock SnapshotStore for testing, backed by an in-memory map
pub struct MockSnapshotStore {
    snapshots: RefCell<BTreeMap<String, SnapshotDocument>>,
    pub should_fail: bool,
}

impl MockSnapshotStore {
    pub fn new() -> Self {
        Self {
            snapshots: RefCell::new(BTreeMap::new()),
            should_fail: false,
        }
    }

    pub fn with_failure() -> Self {
        Self {
            snapshots: RefCell::new(BTreeMap::new()),
            should_fail: true,
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.borrow().len()
    }
}

impl Default for MockSnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore for MockSnapshotStore {
    fn save(&self, snapshot: &SnapshotDocument) -> Result<()> {
        if self.should_fail {
            anyhow::bail!("Mock snapshot store failure");
        }
        let mut snapshots = self.snapshots.borrow_mut();
        if snapshots.contains_key(&snapshot.version_id) {
            anyhow::bail!("Snapshot '{}' already exists", snapshot.version_id);
        }
        snapshots.insert(snapshot.version_id.clone(), snapshot.clone());
        Ok(())
    }

    fn load(&self, version_id: &str) -> Result<Option<SnapshotDocument>> {
        if self.should_fail {
            anyhow::bail!("Mock snapshot store failure");
        }
        Ok(self.snapshots.borrow().get(version_id).cloned())
    }

    fn list_ids(&self) -> Result<Vec<String>> {
        if self.should_fail {
            anyhow::bail!("Mock snapshot store failure");
        }
        Ok(self.snapshots.borrow().keys().cloned().collect())
    }

    fn delete(&self, version_id: &str) -> Result<bool> {
        if self.should_fail {
            anyhow::bail!("Mock snapshot store failure");
        }
        Ok(self.snapshots.borrow_mut().remove(version_id).is_some())
    }
}
