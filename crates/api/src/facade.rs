// Copyright (C) 2026 The termsnap developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::display::{TermDisplay, effective_display_term};
use crate::error::ApiError;
use termsnap::{
    AttributesProvider, CancelToken, Clock, EffectiveSnapshot, SnapshotLifecycle,
};
use termsnap_audit::{
    CleanupReport, CompletenessReport, CoverageReport, ForceRepairReport, RepairReport,
    SnapshotStats,
};
use termsnap_domain::{AcademicYear, PupilAttributes, PupilId, TermId};
use termsnap_persistence::SnapshotStore;

/// A pupil's attributes as resolved for a term, with provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveAttributes {
    /// The resolved attributes.
    pub attributes: PupilAttributes,
    /// Whether this is a live view recomputed on every query rather than a
    /// persisted snapshot.
    pub live_view: bool,
    /// Whether the persisted snapshot was reconstructed from live data after
    /// the term had already ended. Always `false` for live views.
    pub reconstructed: bool,
}

/// The query façade over the snapshot engine.
///
/// The only entry point consuming surfaces use; holds the same seams as the
/// lifecycle manager and builds one per call.
pub struct SnapshotQueries<'a> {
    store: &'a dyn SnapshotStore,
    provider: &'a dyn AttributesProvider,
    clock: &'a dyn Clock,
}

impl<'a> SnapshotQueries<'a> {
    /// Creates a new query façade over the given seams.
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

    const fn lifecycle(&self) -> SnapshotLifecycle<'a> {
        SnapshotLifecycle::new(self.store, self.provider, self.clock)
    }

    /// Resolves a pupil's effective attributes for a term.
    ///
    /// Concluded terms answer from a persisted snapshot (lazily created if
    /// missing); current and future terms answer with a live view.
    ///
    /// # Errors
    ///
    /// Returns an error if the term or pupil is unknown, the calendar is
    /// malformed, the provider is unavailable, or the store fails.
    pub fn effective_attributes(
        &self,
        years: &[AcademicYear],
        pupil: PupilId,
        term: TermId,
    ) -> Result<EffectiveAttributes, ApiError> {
        let effective: EffectiveSnapshot = self.lifecycle().get_or_create(years, pupil, term)?;
        Ok(EffectiveAttributes {
            attributes: effective.attributes().clone(),
            live_view: effective.is_virtual(),
            reconstructed: effective.reconstructed(),
        })
    }

    /// Selects the term to display today.
    ///
    /// # Errors
    ///
    /// Returns an error if the calendar is malformed.
    pub fn effective_display_term<'y>(
        &self,
        years: &'y [AcademicYear],
    ) -> Result<TermDisplay<'y>, ApiError> {
        effective_display_term(years, self.clock.today()).map_err(ApiError::from)
    }

    /// Audits snapshot coverage across the pupil population.
    ///
    /// # Errors
    ///
    /// Returns an error if the calendar is malformed or the store fails.
    pub fn check_coverage(
        &self,
        pupils: &[PupilId],
        years: &[AcademicYear],
    ) -> Result<CoverageReport, ApiError> {
        Ok(self.lifecycle().check_coverage(pupils, years)?)
    }

    /// Creates every missing snapshot from accurate attribute history.
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
    ) -> Result<RepairReport, ApiError> {
        Ok(self.lifecycle().create_all_missing(pupils, years, cancel)?)
    }

    /// Creates every missing snapshot, falling back to live attributes where
    /// history is unavailable.
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
    ) -> Result<ForceRepairReport, ApiError> {
        Ok(self
            .lifecycle()
            .force_create_all_missing(pupils, years, cancel)?)
    }

    /// Deletes snapshots persisted for terms that have not concluded.
    ///
    /// # Errors
    ///
    /// Returns an error if the calendar is malformed or the key enumeration
    /// fails.
    pub fn cleanup_invalid(
        &self,
        years: &[AcademicYear],
        cancel: &CancelToken,
    ) -> Result<CleanupReport, ApiError> {
        Ok(self.lifecycle().cleanup_invalid(years, cancel)?)
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
    ) -> Result<CompletenessReport, ApiError> {
        Ok(self.lifecycle().validate_completeness(pupils, years)?)
    }

    /// Counts persisted snapshots grouped by the temporal phase of their
    /// term.
    ///
    /// # Errors
    ///
    /// Returns an error if the calendar is malformed or the store fails.
    pub fn stats_by_term_status(
        &self,
        years: &[AcademicYear],
    ) -> Result<SnapshotStats, ApiError> {
        Ok(self.lifecycle().stats_by_term_status(years)?)
    }
}
