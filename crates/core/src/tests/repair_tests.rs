// Copyright (C) 2026 The termsnap developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used)]

use super::helpers::{TestProvider, calendar, pupil_ids, year_end_clock};
use crate::{CancelToken, SnapshotLifecycle};
use termsnap_audit::{ForceRepairReport, RepairReport};
use termsnap_domain::{PupilId, SnapshotKey, TermId};
use termsnap_persistence::{InMemorySnapshotStore, SnapshotStore};

#[test]
fn test_repair_creates_all_missing_from_history() {
    let store: InMemorySnapshotStore = InMemorySnapshotStore::new();
    let provider: TestProvider = TestProvider::with_pupils(5).with_full_history();
    let clock = year_end_clock();
    let lifecycle = SnapshotLifecycle::new(&store, &provider, &clock);

    let report: RepairReport = lifecycle
        .create_all_missing(&pupil_ids(5), &calendar(), &CancelToken::new())
        .unwrap();

    // 5 pupils x 3 concluded terms.
    assert_eq!(report.created, 15);
    assert_eq!(report.skipped, 0);
    assert!(report.errors.is_empty());

    let coverage = lifecycle.check_coverage(&pupil_ids(5), &calendar()).unwrap();
    assert!(coverage.is_complete());
}

#[test]
fn test_repaired_snapshots_are_accurate_not_reconstructed() {
    let store: InMemorySnapshotStore = InMemorySnapshotStore::new();
    let provider: TestProvider = TestProvider::with_pupils(1).with_full_history();
    let clock = year_end_clock();
    let lifecycle = SnapshotLifecycle::new(&store, &provider, &clock);

    lifecycle
        .create_all_missing(&pupil_ids(1), &calendar(), &CancelToken::new())
        .unwrap();

    let snapshot = store
        .get(SnapshotKey::new(PupilId::new(1), TermId::new(1)))
        .unwrap()
        .unwrap();
    assert!(!snapshot.reconstructed());
    assert_eq!(snapshot.attributes().class_group, "hist-1");
}

#[test]
fn test_repair_is_idempotent() {
    let store: InMemorySnapshotStore = InMemorySnapshotStore::new();
    let provider: TestProvider = TestProvider::with_pupils(3).with_full_history();
    let clock = year_end_clock();
    let lifecycle = SnapshotLifecycle::new(&store, &provider, &clock);

    let first: RepairReport = lifecycle
        .create_all_missing(&pupil_ids(3), &calendar(), &CancelToken::new())
        .unwrap();
    let second: RepairReport = lifecycle
        .create_all_missing(&pupil_ids(3), &calendar(), &CancelToken::new())
        .unwrap();

    assert_eq!(first.created, 9);
    assert_eq!(second.created, 0);
    assert_eq!(second.skipped, 0);
    assert!(second.errors.is_empty());
}

#[test]
fn test_repair_isolates_per_item_failures() {
    let store: InMemorySnapshotStore = InMemorySnapshotStore::new();
    // Only pupil 2 has attribute history; pupils 1 and 3 fail per item.
    let provider: TestProvider = TestProvider::with_pupils(3).with_history_for(2);
    let clock = year_end_clock();
    let lifecycle = SnapshotLifecycle::new(&store, &provider, &clock);

    let report: RepairReport = lifecycle
        .create_all_missing(&pupil_ids(3), &calendar(), &CancelToken::new())
        .unwrap();

    assert_eq!(report.created, 3);
    assert_eq!(report.errors.len(), 6);
    assert!(
        report
            .errors
            .iter()
            .all(|failure| failure.pupil != PupilId::new(2))
    );
}

#[test]
fn test_repair_retries_only_still_missing_items() {
    let store: InMemorySnapshotStore = InMemorySnapshotStore::new();
    let clock = year_end_clock();

    let partial: TestProvider = TestProvider::with_pupils(2).with_history_for(1);
    let first: RepairReport = SnapshotLifecycle::new(&store, &partial, &clock)
        .create_all_missing(&pupil_ids(2), &calendar(), &CancelToken::new())
        .unwrap();
    assert_eq!(first.created, 3);
    assert_eq!(first.errors.len(), 3);

    // History for pupil 2 becomes available; the rerun only attempts the
    // three still-missing items.
    let full: TestProvider = TestProvider::with_pupils(2).with_full_history();
    let second: RepairReport = SnapshotLifecycle::new(&store, &full, &clock)
        .create_all_missing(&pupil_ids(2), &calendar(), &CancelToken::new())
        .unwrap();

    assert_eq!(second.created, 3);
    assert!(second.errors.is_empty());
    assert_eq!(store.keys().unwrap().len(), 6);
}

#[test]
fn test_cancelled_repair_commits_nothing_further() {
    let store: InMemorySnapshotStore = InMemorySnapshotStore::new();
    let provider: TestProvider = TestProvider::with_pupils(5).with_full_history();
    let clock = year_end_clock();
    let lifecycle = SnapshotLifecycle::new(&store, &provider, &clock);

    let cancel: CancelToken = CancelToken::new();
    cancel.cancel();

    let report: RepairReport = lifecycle
        .create_all_missing(&pupil_ids(5), &calendar(), &cancel)
        .unwrap();

    assert_eq!(report.created, 0);
    assert!(store.keys().unwrap().is_empty());
}

#[test]
fn test_force_repair_recovers_missing_history_with_live_data() {
    let store: InMemorySnapshotStore = InMemorySnapshotStore::new();
    let provider: TestProvider = TestProvider::with_pupils(4);
    let clock = year_end_clock();
    let lifecycle = SnapshotLifecycle::new(&store, &provider, &clock);

    let report: ForceRepairReport = lifecycle
        .force_create_all_missing(&pupil_ids(4), &calendar(), &CancelToken::new())
        .unwrap();

    assert_eq!(report.snapshots_created, 12);
    assert_eq!(report.terms_processed, 3);
    assert_eq!(report.errors_recovered, 12);
    assert!(report.errors.is_empty());

    let snapshot = store
        .get(SnapshotKey::new(PupilId::new(1), TermId::new(1)))
        .unwrap()
        .unwrap();
    assert!(snapshot.reconstructed());
    assert_eq!(snapshot.attributes().class_group, "live-1");
}

#[test]
fn test_force_repair_prefers_accurate_history_when_present() {
    let store: InMemorySnapshotStore = InMemorySnapshotStore::new();
    let provider: TestProvider = TestProvider::with_pupils(2).with_history_for(1);
    let clock = year_end_clock();
    let lifecycle = SnapshotLifecycle::new(&store, &provider, &clock);

    let report: ForceRepairReport = lifecycle
        .force_create_all_missing(&pupil_ids(2), &calendar(), &CancelToken::new())
        .unwrap();

    assert_eq!(report.snapshots_created, 6);
    assert_eq!(report.errors_recovered, 3);

    let accurate = store
        .get(SnapshotKey::new(PupilId::new(1), TermId::new(2)))
        .unwrap()
        .unwrap();
    assert!(!accurate.reconstructed());

    let recovered = store
        .get(SnapshotKey::new(PupilId::new(2), TermId::new(2)))
        .unwrap()
        .unwrap();
    assert!(recovered.reconstructed());
}

#[test]
fn test_force_repair_reports_unrecoverable_items() {
    let store: InMemorySnapshotStore = InMemorySnapshotStore::new();
    // Pupils 1..=2 are known; 3 is in the roster handed to the operation but
    // unknown to the provider.
    let provider: TestProvider = TestProvider::with_pupils(2);
    let clock = year_end_clock();
    let lifecycle = SnapshotLifecycle::new(&store, &provider, &clock);

    let report: ForceRepairReport = lifecycle
        .force_create_all_missing(&pupil_ids(3), &calendar(), &CancelToken::new())
        .unwrap();

    assert_eq!(report.snapshots_created, 6);
    assert_eq!(report.errors.len(), 3);
    assert!(
        report
            .errors
            .iter()
            .all(|failure| failure.pupil == PupilId::new(3))
    );
}
