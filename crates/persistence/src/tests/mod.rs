// Copyright (C) 2026 The termsnap developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used)]

use crate::{InMemorySnapshotStore, SnapshotStore, StoreError};
use std::collections::BTreeMap;
use termsnap_audit::SnapshotStats;
use termsnap_domain::{
    PupilAttributes, PupilId, Snapshot, SnapshotKey, TermId, TermPhase,
};
use time::macros::datetime;

fn key(pupil: i64, term: i64) -> SnapshotKey {
    SnapshotKey::new(PupilId::new(pupil), TermId::new(term))
}

fn snapshot(pupil: i64, term: i64, class_group: &str) -> Snapshot {
    Snapshot::new(
        key(pupil, term),
        PupilAttributes::new(
            class_group.to_string(),
            String::from("A"),
            String::from("standard"),
        ),
        datetime!(2025 - 05 - 02 08:00 UTC),
        false,
    )
}

#[test]
fn test_get_returns_none_for_absent_key() {
    let store: InMemorySnapshotStore = InMemorySnapshotStore::new();

    assert_eq!(store.get(key(1, 1)).unwrap(), None);
}

#[test]
fn test_put_then_get_round_trip() {
    let store: InMemorySnapshotStore = InMemorySnapshotStore::new();
    store.put(snapshot(1, 1, "4B"), false).unwrap();

    let stored: Snapshot = store.get(key(1, 1)).unwrap().unwrap();
    assert_eq!(stored.attributes().class_group, "4B");
    assert!(!stored.reconstructed());
}

#[test]
fn test_put_conflicts_on_existing_key() {
    let store: InMemorySnapshotStore = InMemorySnapshotStore::new();
    store.put(snapshot(1, 1, "4B"), false).unwrap();

    let result = store.put(snapshot(1, 1, "5A"), false);
    assert_eq!(
        result.unwrap_err(),
        StoreError::Conflict { key: key(1, 1) }
    );

    // The original snapshot is untouched.
    let stored: Snapshot = store.get(key(1, 1)).unwrap().unwrap();
    assert_eq!(stored.attributes().class_group, "4B");
}

#[test]
fn test_put_with_overwrite_replaces() {
    let store: InMemorySnapshotStore = InMemorySnapshotStore::new();
    store.put(snapshot(1, 1, "4B"), false).unwrap();
    store.put(snapshot(1, 1, "5A"), true).unwrap();

    let stored: Snapshot = store.get(key(1, 1)).unwrap().unwrap();
    assert_eq!(stored.attributes().class_group, "5A");
}

#[test]
fn test_delete_removes_snapshot() {
    let store: InMemorySnapshotStore = InMemorySnapshotStore::new();
    store.put(snapshot(1, 1, "4B"), false).unwrap();

    store.delete(key(1, 1)).unwrap();
    assert_eq!(store.get(key(1, 1)).unwrap(), None);
}

#[test]
fn test_delete_absent_key_is_not_found() {
    let store: InMemorySnapshotStore = InMemorySnapshotStore::new();

    assert_eq!(
        store.delete(key(1, 1)).unwrap_err(),
        StoreError::SnapshotNotFound { key: key(1, 1) }
    );
}

#[test]
fn test_list_by_term() {
    let store: InMemorySnapshotStore = InMemorySnapshotStore::new();
    store.put(snapshot(1, 1, "4B"), false).unwrap();
    store.put(snapshot(2, 1, "4B"), false).unwrap();
    store.put(snapshot(1, 2, "4B"), false).unwrap();

    let listed: Vec<Snapshot> = store.list_by_term(TermId::new(1)).unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|s| s.term() == TermId::new(1)));
}

#[test]
fn test_keys_lists_all_keys() {
    let store: InMemorySnapshotStore = InMemorySnapshotStore::new();
    store.put(snapshot(1, 1, "4B"), false).unwrap();
    store.put(snapshot(2, 3, "4B"), false).unwrap();

    let keys: Vec<SnapshotKey> = store.keys().unwrap();
    assert_eq!(keys, vec![key(1, 1), key(2, 3)]);
}

#[test]
fn test_count_by_phase_groups_with_supplied_classification() {
    let store: InMemorySnapshotStore = InMemorySnapshotStore::new();
    store.put(snapshot(1, 1, "4B"), false).unwrap();
    store.put(snapshot(2, 1, "4B"), false).unwrap();
    store.put(snapshot(1, 2, "4B"), false).unwrap();
    store.put(snapshot(1, 3, "4B"), false).unwrap();

    let mut phases: BTreeMap<TermId, TermPhase> = BTreeMap::new();
    phases.insert(TermId::new(1), TermPhase::Concluded);
    phases.insert(TermId::new(2), TermPhase::Current);
    phases.insert(TermId::new(3), TermPhase::Future);

    let stats: SnapshotStats = store.count_by_phase(&phases).unwrap();
    assert_eq!(stats.concluded, 2);
    assert_eq!(stats.current, 1);
    assert_eq!(stats.future, 1);
    assert!(!stats.is_healthy());
}

#[test]
fn test_count_by_phase_skips_unknown_terms() {
    let store: InMemorySnapshotStore = InMemorySnapshotStore::new();
    store.put(snapshot(1, 99, "4B"), false).unwrap();

    let phases: BTreeMap<TermId, TermPhase> = BTreeMap::new();
    let stats: SnapshotStats = store.count_by_phase(&phases).unwrap();

    assert_eq!(stats.total(), 0);
}
