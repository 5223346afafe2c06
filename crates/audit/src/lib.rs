// Copyright (C) 2026 The termsnap developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

//! Typed reports produced by snapshot audit and repair operations.
//!
//! Every bulk operation returns one of these records with a fixed field set,
//! so coverage and health properties can be asserted statically instead of
//! probing loosely shaped result blobs. Per-item failures are carried as data
//! in the report's `errors` vector; they never abort sibling items.

use serde::Serialize;
use termsnap_domain::{PupilId, SnapshotKey, TermId};

/// A single per-item failure inside a bulk operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    /// The pupil the failed item targeted.
    pub pupil: PupilId,
    /// The term the failed item targeted.
    pub term: TermId,
    /// A human-readable description of the failure.
    pub message: String,
}

impl ItemFailure {
    /// Creates a new item failure record.
    #[must_use]
    pub const fn new(pupil: PupilId, term: TermId, message: String) -> Self {
        Self {
            pupil,
            term,
            message,
        }
    }
}

/// The result of a population-wide coverage audit.
///
/// Expected coverage is every pupil crossed with every concluded term. This
/// report is produced by a pure read; computing it has no side effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageReport {
    /// The number of snapshots that should exist.
    pub expected: usize,
    /// The number of snapshots that do exist.
    pub existing: usize,
    /// The (pupil, term) pairs lacking a snapshot.
    pub missing: Vec<SnapshotKey>,
}

impl CoverageReport {
    /// Creates a new coverage report.
    #[must_use]
    pub const fn new(expected: usize, existing: usize, missing: Vec<SnapshotKey>) -> Self {
        Self {
            expected,
            existing,
            missing,
        }
    }

    /// Returns whether every expected snapshot exists.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// The result of a normal bulk repair run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct RepairReport {
    /// Snapshots created by this run.
    pub created: usize,
    /// Items skipped because a snapshot already existed (e.g., created by a
    /// concurrent writer between the coverage scan and the write).
    pub skipped: usize,
    /// Per-item failures. These items remain missing and will be retried by
    /// the next run.
    pub errors: Vec<ItemFailure>,
}

/// The result of an aggressive bulk repair run.
///
/// Unlike [`RepairReport`], reconstruction fallbacks are tolerated and
/// counted rather than treated as failures, trading confidence for coverage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct ForceRepairReport {
    /// Snapshots created by this run, accurate and reconstructed alike.
    pub snapshots_created: usize,
    /// Distinct concluded terms touched by this run.
    pub terms_processed: usize,
    /// Snapshots created from best-effort live data because true historical
    /// data was unavailable.
    pub errors_recovered: usize,
    /// Per-item failures that could not be recovered.
    pub errors: Vec<ItemFailure>,
}

/// The result of an invalid-snapshot cleanup run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct CleanupReport {
    /// Snapshots deleted because they were held for a non-concluded term.
    pub deleted: usize,
    /// Per-item failures, including snapshots whose term is not present in
    /// the configured calendar (surfaced for diagnosis, not deleted).
    pub errors: Vec<ItemFailure>,
}

/// The result of a strict completeness gate.
///
/// A boolean-producing wrapper over the coverage audit, intended for
/// automated gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletenessReport {
    /// The number of snapshots that should exist.
    pub total_expected: usize,
    /// The number of snapshots that do exist.
    pub total_existing: usize,
    /// The number of missing snapshots.
    pub missing_count: usize,
    /// Whether the population passed the gate (no missing snapshots).
    pub passed: bool,
}

impl CompletenessReport {
    /// Creates a completeness report from a coverage report.
    #[must_use]
    pub fn from_coverage(coverage: &CoverageReport) -> Self {
        Self {
            total_expected: coverage.expected,
            total_existing: coverage.existing,
            missing_count: coverage.missing.len(),
            passed: coverage.missing.is_empty(),
        }
    }
}

/// Snapshot counts grouped by the temporal phase of their term.
///
/// `current` and `future` are zero in a healthy system; non-zero values are
/// the primary corruption signal surfaced to operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct SnapshotStats {
    /// Snapshots held for concluded terms.
    pub concluded: usize,
    /// Snapshots held for the current term (invalid).
    pub current: usize,
    /// Snapshots held for future terms (invalid).
    pub future: usize,
}

impl SnapshotStats {
    /// Returns the total number of counted snapshots.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.concluded + self.current + self.future
    }

    /// Returns whether no snapshot is held for a non-concluded term.
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        self.current == 0 && self.future == 0
    }
}
