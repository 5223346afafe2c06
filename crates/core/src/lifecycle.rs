// Copyright (C) 2026 The termsnap developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The snapshot lifecycle manager.
//!
//! Per (pupil, term) pair the lifecycle is: no snapshot → term concludes →
//! eligible → lazy or bulk creation → persisted. Persisted is terminal; the
//! only exit is [`SnapshotLifecycle::cleanup_invalid`], and that transition is
//! legal only for the corrupt persisted-while-not-concluded state, which no
//! operation here produces deliberately.

use crate::cancel::CancelToken;
use crate::clock::Clock;
use crate::error::CoreError;
use crate::provider::{AttributesProvider, ProviderError};
use std::collections::{BTreeMap, BTreeSet};
use termsnap_audit::{
    CleanupReport, CompletenessReport, CoverageReport, ForceRepairReport, ItemFailure,
    RepairReport, SnapshotStats,
};
use termsnap_domain::{
    AcademicYear, PupilAttributes, PupilId, Snapshot, SnapshotKey, Term, TermId, TermPhase,
    VirtualSnapshot, concluded_terms, find_term, phase_map, validate_years,
};
use termsnap_persistence::{SnapshotStore, StoreError};
use tracing::{debug, info, warn};

/// The result of resolving a pupil's attributes for a term.
///
/// A tagged result instead of identifier conventions: callers branch on the
/// variant (or [`EffectiveSnapshot::is_virtual`]), never on the shape of an
/// id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectiveSnapshot {
    /// A persisted snapshot for a concluded term.
    Persisted(Snapshot),
    /// A live view for a term that has not concluded. Never persisted,
    /// recomputed on every query.
    Virtual(VirtualSnapshot),
}

impl EffectiveSnapshot {
    /// Returns whether this is a live view rather than a persisted snapshot.
    #[must_use]
    pub const fn is_virtual(&self) -> bool {
        matches!(self, Self::Virtual(_))
    }

    /// Returns the resolved attributes.
    #[must_use]
    pub const fn attributes(&self) -> &PupilAttributes {
        match self {
            Self::Persisted(snapshot) => snapshot.attributes(),
            Self::Virtual(view) => &view.attributes,
        }
    }

    /// Returns whether the underlying snapshot was reconstructed from live
    /// data. Always `false` for virtual results.
    #[must_use]
    pub const fn reconstructed(&self) -> bool {
        match self {
            Self::Persisted(snapshot) => snapshot.reconstructed(),
            Self::Virtual(_) => false,
        }
    }
}

/// Orchestrates snapshot creation, auditing, repair and cleanup.
///
/// Holds no state of its own; everything flows through the injected store,
/// provider and clock seams.
pub struct SnapshotLifecycle<'a> {
    store: &'a dyn SnapshotStore,
    provider: &'a dyn AttributesProvider,
    clock: &'a dyn Clock,
}

impl<'a> SnapshotLifecycle<'a> {
    /// Creates a new lifecycle manager over the given seams.
    #[must_use]
    pub const fn new(
        store: &'a dyn SnapshotStore,
        provider: &'a dyn AttributesProvider,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            store,
            provider,
            clock,
        }
    }

    /// Resolves the effective snapshot for a (pupil, term) pair.
    ///
    /// For a concluded term, reads through the store and lazily creates a
    /// missing snapshot from live attributes, flagged `reconstructed` since
    /// the live attributes at read time are not guaranteed to equal the
    /// attributes at the moment the term actually ended. A concurrent
    /// creator's write conflict is resolved by re-reading the winner's
    /// snapshot. For a current or future term, the store is never touched and
    /// a virtual view is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the calendar is malformed, the term is unknown,
    /// the provider fails, or the store fails.
    pub fn get_or_create(
        &self,
        years: &[AcademicYear],
        pupil: PupilId,
        term_id: TermId,
    ) -> Result<EffectiveSnapshot, CoreError> {
        validate_years(years)?;
        let (_, term) = find_term(years, term_id).ok_or(CoreError::TermNotFound(term_id))?;

        match term.phase(self.clock.today()) {
            TermPhase::Concluded => self.read_through(pupil, term_id),
            TermPhase::Current | TermPhase::Future => {
                let attributes: PupilAttributes = self.provider.current_attributes(pupil)?;
                Ok(EffectiveSnapshot::Virtual(VirtualSnapshot::new(
                    pupil, term_id, attributes,
                )))
            }
        }
    }

    fn read_through(
        &self,
        pupil: PupilId,
        term_id: TermId,
    ) -> Result<EffectiveSnapshot, CoreError> {
        let key: SnapshotKey = SnapshotKey::new(pupil, term_id);

        if let Some(existing) = self.store.get(key)? {
            return Ok(EffectiveSnapshot::Persisted(existing));
        }

        let attributes: PupilAttributes = self.provider.current_attributes(pupil)?;
        let snapshot: Snapshot = Snapshot::new(key, attributes, self.clock.now(), true);

        match self.store.put(snapshot.clone(), false) {
            Ok(()) => {
                debug!(
                    pupil = pupil.value(),
                    term = term_id.value(),
                    "Lazily created reconstructed snapshot"
                );
                Ok(EffectiveSnapshot::Persisted(snapshot))
            }
            Err(StoreError::Conflict { .. }) => {
                // Lost the race; the winner's snapshot is authoritative.
                let winner: Snapshot = self
                    .store
                    .get(key)?
                    .ok_or(CoreError::Store(StoreError::SnapshotNotFound { key }))?;
                Ok(EffectiveSnapshot::Persisted(winner))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Audits snapshot coverage across the pupil population.
    ///
    /// Expected coverage is every pupil crossed with every concluded term.
    /// This is a pure read: no snapshot is created or modified.
    ///
    /// # Errors
    ///
    /// Returns an error if the calendar is malformed or the store fails.
    pub fn check_coverage(
        &self,
        pupils: &[PupilId],
        years: &[AcademicYear],
    ) -> Result<CoverageReport, CoreError> {
        validate_years(years)?;
        let concluded: Vec<&Term> = concluded_terms(years, self.clock.today());

        let expected: usize = pupils.len() * concluded.len();
        let mut existing: usize = 0;
        let mut missing: Vec<SnapshotKey> = Vec::new();

        for term in &concluded {
            for pupil in pupils {
                let key: SnapshotKey = SnapshotKey::new(*pupil, term.id());
                if self.store.get(key)?.is_some() {
                    existing += 1;
                } else {
                    missing.push(key);
                }
            }
        }

        Ok(CoverageReport::new(expected, existing, missing))
    }

    /// Creates every missing snapshot using accurate historical attributes.
    ///
    /// Per-item failures (typically missing attribute history) are collected
    /// without aborting the batch; those items stay missing and a later run
    /// only attempts the still-missing items, so the operation is idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the calendar is malformed or the coverage scan
    /// fails.
    pub fn create_all_missing(
        &self,
        pupils: &[PupilId],
        years: &[AcademicYear],
        cancel: &CancelToken,
    ) -> Result<RepairReport, CoreError> {
        let coverage: CoverageReport = self.check_coverage(pupils, years)?;
        let mut report: RepairReport = RepairReport::default();

        for key in coverage.missing {
            if cancel.is_cancelled() {
                warn!("Snapshot repair cancelled; returning partial result");
                break;
            }

            let Some((_, term)) = find_term(years, key.term) else {
                // Unreachable: the coverage scan only emits configured terms.
                continue;
            };

            match self.create_accurate(key, term) {
                Ok(true) => report.created += 1,
                Ok(false) => report.skipped += 1,
                Err(err) => {
                    report
                        .errors
                        .push(ItemFailure::new(key.pupil, key.term, err.to_string()));
                }
            }
        }

        info!(
            created = report.created,
            skipped = report.skipped,
            errors = report.errors.len(),
            "Snapshot repair finished"
        );
        Ok(report)
    }

    /// Persists an accurate snapshot for a missing item.
    ///
    /// Returns `Ok(false)` when a concurrent writer created the snapshot
    /// between the coverage scan and this write.
    fn create_accurate(&self, key: SnapshotKey, term: &Term) -> Result<bool, CoreError> {
        let attributes: PupilAttributes = self
            .provider
            .attributes_as_of(key.pupil, term.ends_on())?;
        let snapshot: Snapshot = Snapshot::new(key, attributes, self.clock.now(), false);

        match self.store.put(snapshot, false) {
            Ok(()) => Ok(true),
            Err(StoreError::Conflict { .. }) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Creates every missing snapshot, falling back to live attributes where
    /// attribute history is unavailable.
    ///
    /// The aggressive counterpart of [`SnapshotLifecycle::create_all_missing`]:
    /// it prefers a lower-confidence `reconstructed` snapshot over leaving a
    /// gap, and counts each fallback in `errors_recovered`.
    ///
    /// # Errors
    ///
    /// Returns an error if the calendar is malformed or the coverage scan
    /// fails.
    pub fn force_create_all_missing(
        &self,
        pupils: &[PupilId],
        years: &[AcademicYear],
        cancel: &CancelToken,
    ) -> Result<ForceRepairReport, CoreError> {
        let coverage: CoverageReport = self.check_coverage(pupils, years)?;
        let mut report: ForceRepairReport = ForceRepairReport::default();
        let mut terms_touched: BTreeSet<TermId> = BTreeSet::new();

        for key in coverage.missing {
            if cancel.is_cancelled() {
                warn!("Forced snapshot repair cancelled; returning partial result");
                break;
            }

            let Some((_, term)) = find_term(years, key.term) else {
                continue;
            };
            terms_touched.insert(key.term);

            match self.provider.attributes_as_of(key.pupil, term.ends_on()) {
                Ok(attributes) => {
                    if self.persist_forced(key, attributes, false)? {
                        report.snapshots_created += 1;
                    }
                }
                Err(ProviderError::HistoryUnavailable { .. }) => {
                    match self.provider.current_attributes(key.pupil) {
                        Ok(attributes) => {
                            if self.persist_forced(key, attributes, true)? {
                                report.snapshots_created += 1;
                                report.errors_recovered += 1;
                            }
                        }
                        Err(err) => {
                            report.errors.push(ItemFailure::new(
                                key.pupil,
                                key.term,
                                err.to_string(),
                            ));
                        }
                    }
                }
                Err(err) => {
                    report
                        .errors
                        .push(ItemFailure::new(key.pupil, key.term, err.to_string()));
                }
            }
        }

        report.terms_processed = terms_touched.len();
        info!(
            snapshots_created = report.snapshots_created,
            terms_processed = report.terms_processed,
            errors_recovered = report.errors_recovered,
            errors = report.errors.len(),
            "Forced snapshot repair finished"
        );
        Ok(report)
    }

    /// Persists a snapshot for the force-repair path, treating a write
    /// conflict as already satisfied.
    fn persist_forced(
        &self,
        key: SnapshotKey,
        attributes: PupilAttributes,
        reconstructed: bool,
    ) -> Result<bool, CoreError> {
        let snapshot: Snapshot = Snapshot::new(key, attributes, self.clock.now(), reconstructed);
        match self.store.put(snapshot, false) {
            Ok(()) => Ok(true),
            Err(StoreError::Conflict { .. }) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes snapshots persisted for terms that have not concluded.
    ///
    /// This state never arises through the operations exposed here; it is a
    /// corruption signal (clock skew at write time, manual data edits).
    /// Snapshots whose term is absent from the configured calendar cannot be
    /// classified and are surfaced in `errors` instead of deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the calendar is malformed or the key enumeration
    /// fails.
    pub fn cleanup_invalid(
        &self,
        years: &[AcademicYear],
        cancel: &CancelToken,
    ) -> Result<CleanupReport, CoreError> {
        validate_years(years)?;
        let phases: BTreeMap<TermId, TermPhase> = phase_map(years, self.clock.today());
        let mut report: CleanupReport = CleanupReport::default();

        for key in self.store.keys()? {
            if cancel.is_cancelled() {
                warn!("Snapshot cleanup cancelled; returning partial result");
                break;
            }

            match phases.get(&key.term) {
                Some(TermPhase::Concluded) => {}
                Some(TermPhase::Current | TermPhase::Future) => {
                    match self.store.delete(key) {
                        Ok(()) => {
                            warn!(
                                pupil = key.pupil.value(),
                                term = key.term.value(),
                                "Deleted snapshot persisted for a non-concluded term"
                            );
                            report.deleted += 1;
                        }
                        // Deleted concurrently; the invalid entry is gone
                        // either way.
                        Err(StoreError::SnapshotNotFound { .. }) => {}
                        Err(err) => {
                            report.errors.push(ItemFailure::new(
                                key.pupil,
                                key.term,
                                err.to_string(),
                            ));
                        }
                    }
                }
                None => {
                    report.errors.push(ItemFailure::new(
                        key.pupil,
                        key.term,
                        String::from("term is not present in the configured academic years"),
                    ));
                }
            }
        }

        info!(
            deleted = report.deleted,
            errors = report.errors.len(),
            "Snapshot cleanup finished"
        );
        Ok(report)
    }

    /// Runs the strict completeness gate over the pupil population.
    ///
    /// # Errors
    ///
    /// Returns an error if the calendar is malformed or the store fails.
    pub fn validate_completeness(
        &self,
        pupils: &[PupilId],
        years: &[AcademicYear],
    ) -> Result<CompletenessReport, CoreError> {
        let coverage: CoverageReport = self.check_coverage(pupils, years)?;
        Ok(CompletenessReport::from_coverage(&coverage))
    }

    /// Counts persisted snapshots grouped by the temporal phase of their
    /// term.
    ///
    /// Non-zero `current` or `future` counts are the primary health signal
    /// surfaced to operators.
    ///
    /// # Errors
    ///
    /// Returns an error if the calendar is malformed or the store fails.
    pub fn stats_by_term_status(
        &self,
        years: &[AcademicYear],
    ) -> Result<SnapshotStats, CoreError> {
        validate_years(years)?;
        let phases: BTreeMap<TermId, TermPhase> = phase_map(years, self.clock.today());
        Ok(self.store.count_by_phase(&phases)?)
    }
}
