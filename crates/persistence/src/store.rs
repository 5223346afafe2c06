// Copyright (C) 2026 The termsnap developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::StoreError;
use std::collections::BTreeMap;
use termsnap_audit::SnapshotStats;
use termsnap_domain::{Snapshot, SnapshotKey, TermId, TermPhase};

/// The keyed persistence contract for snapshots.
///
/// Implementations store at most one snapshot per (pupil, term) key and must
/// make `put` an atomic check-and-insert: a write against an existing key
/// without `overwrite` fails with [`StoreError::Conflict`] instead of
/// silently replacing the stored snapshot. That failure is how racing lazy
/// creators discover that someone else already won.
pub trait SnapshotStore: Send + Sync {
    /// Fetches the snapshot for a key, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn get(&self, key: SnapshotKey) -> Result<Option<Snapshot>, StoreError>;

    /// Persists a snapshot.
    ///
    /// # Arguments
    ///
    /// * `snapshot` - The snapshot to persist
    /// * `overwrite` - Whether an existing snapshot for the same key may be
    ///   replaced. Only explicit repair paths pass `true`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if a snapshot already exists for the
    /// key and `overwrite` is `false`, or an error if the backend fails.
    fn put(&self, snapshot: Snapshot, overwrite: bool) -> Result<(), StoreError>;

    /// Deletes the snapshot for a key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SnapshotNotFound`] if no snapshot exists for the
    /// key, or an error if the backend fails.
    fn delete(&self, key: SnapshotKey) -> Result<(), StoreError>;

    /// Lists all snapshots persisted for a term.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn list_by_term(&self, term: TermId) -> Result<Vec<Snapshot>, StoreError>;

    /// Lists the keys of all persisted snapshots.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn keys(&self) -> Result<Vec<SnapshotKey>, StoreError>;

    /// Counts persisted snapshots grouped by the temporal phase of their term.
    ///
    /// The caller supplies the classification; this store never reasons about
    /// time itself. Snapshots for terms absent from the map are not counted;
    /// the cleanup audit surfaces them separately.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn count_by_phase(
        &self,
        phases: &BTreeMap<TermId, TermPhase>,
    ) -> Result<SnapshotStats, StoreError> {
        let mut stats: SnapshotStats = SnapshotStats::default();
        for key in self.keys()? {
            match phases.get(&key.term) {
                Some(TermPhase::Concluded) => stats.concluded += 1,
                Some(TermPhase::Current) => stats.current += 1,
                Some(TermPhase::Future) => stats.future += 1,
                None => {}
            }
        }
        Ok(stats)
    }
}
