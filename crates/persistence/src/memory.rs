// Copyright (C) 2026 The termsnap developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::StoreError;
use crate::store::SnapshotStore;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use termsnap_domain::{Snapshot, SnapshotKey, TermId};
use tracing::debug;

/// The in-memory reference backend.
///
/// All operations take the single mutex, so `put` is an atomic
/// check-and-insert and concurrent lazy creation of the same key admits
/// exactly one writer.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    /// The stored snapshots, keyed by (pupil, term).
    snapshots: Mutex<BTreeMap<SnapshotKey, Snapshot>>,
}

impl InMemorySnapshotStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<SnapshotKey, Snapshot>>, StoreError> {
        self.snapshots
            .lock()
            .map_err(|_| StoreError::Backend(String::from("snapshot store mutex poisoned")))
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn get(&self, key: SnapshotKey) -> Result<Option<Snapshot>, StoreError> {
        Ok(self.lock()?.get(&key).cloned())
    }

    fn put(&self, snapshot: Snapshot, overwrite: bool) -> Result<(), StoreError> {
        let key: SnapshotKey = snapshot.key();
        let mut guard = self.lock()?;

        if !overwrite && guard.contains_key(&key) {
            return Err(StoreError::Conflict { key });
        }

        debug!(
            pupil = key.pupil.value(),
            term = key.term.value(),
            reconstructed = snapshot.reconstructed(),
            overwrite,
            "Persisting snapshot"
        );
        guard.insert(key, snapshot);
        Ok(())
    }

    fn delete(&self, key: SnapshotKey) -> Result<(), StoreError> {
        let mut guard = self.lock()?;

        if guard.remove(&key).is_none() {
            return Err(StoreError::SnapshotNotFound { key });
        }

        debug!(
            pupil = key.pupil.value(),
            term = key.term.value(),
            "Deleted snapshot"
        );
        Ok(())
    }

    fn list_by_term(&self, term: TermId) -> Result<Vec<Snapshot>, StoreError> {
        Ok(self
            .lock()?
            .values()
            .filter(|snapshot| snapshot.term() == term)
            .cloned()
            .collect())
    }

    fn keys(&self) -> Result<Vec<SnapshotKey>, StoreError> {
        Ok(self.lock()?.keys().copied().collect())
    }
}
