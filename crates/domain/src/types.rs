// Copyright (C) 2026 The termsnap developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Core calendar and snapshot types.
//!
//! Academic years and terms are constructed only through validating
//! constructors, so any value of these types satisfies the ordering and
//! containment invariants the resolver relies on. The "current term" is never
//! stored as a flag anywhere; it is always derived from an evaluation date.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

/// Identifies a pupil.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PupilId(i64);

impl PupilId {
    /// Creates a new pupil identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PupilId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a term. Term identifiers are unique across all academic years.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TermId(i64);

impl TermId {
    /// Creates a new term identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The composite key identifying a persisted snapshot.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SnapshotKey {
    /// The pupil the snapshot belongs to.
    pub pupil: PupilId,
    /// The term the snapshot was taken for.
    pub term: TermId,
}

impl SnapshotKey {
    /// Creates a new snapshot key.
    #[must_use]
    pub const fn new(pupil: PupilId, term: TermId) -> Self {
        Self { pupil, term }
    }
}

impl std::fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(pupil {}, term {})", self.pupil, self.term)
    }
}

/// The temporal phase of a term relative to an evaluation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TermPhase {
    /// The term's end date is before the evaluation date.
    Concluded,
    /// The term has started and has not concluded.
    Current,
    /// The term's start date is after the evaluation date.
    Future,
}

impl TermPhase {
    /// Converts this phase to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Concluded => "concluded",
            Self::Current => "current",
            Self::Future => "future",
        }
    }
}

impl std::fmt::Display for TermPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A bounded interval within an academic year (e.g., an academic term).
///
/// Date bounds are inclusive. Terms never overlap within the same year; that
/// invariant is enforced by [`AcademicYear::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// The term identifier.
    id: TermId,
    /// The academic year this term belongs to.
    year: u16,
    /// Human-readable name (e.g., "Term 2").
    name: String,
    /// First day of the term (inclusive).
    starts_on: Date,
    /// Last day of the term (inclusive).
    ends_on: Date,
}

impl Term {
    /// Creates a new term.
    ///
    /// # Errors
    ///
    /// Returns an error if the start date is after the end date.
    pub fn new(
        id: TermId,
        year: u16,
        name: String,
        starts_on: Date,
        ends_on: Date,
    ) -> Result<Self, DomainError> {
        if starts_on > ends_on {
            return Err(DomainError::InvalidTermBounds {
                term: id,
                starts_on,
                ends_on,
            });
        }

        Ok(Self {
            id,
            year,
            name,
            starts_on,
            ends_on,
        })
    }

    /// Returns the term identifier.
    #[must_use]
    pub const fn id(&self) -> TermId {
        self.id
    }

    /// Returns the academic year this term belongs to.
    #[must_use]
    pub const fn year(&self) -> u16 {
        self.year
    }

    /// Returns the term name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the first day of the term (inclusive).
    #[must_use]
    pub const fn starts_on(&self) -> Date {
        self.starts_on
    }

    /// Returns the last day of the term (inclusive).
    #[must_use]
    pub const fn ends_on(&self) -> Date {
        self.ends_on
    }

    /// Returns whether the given date falls within this term.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.starts_on <= date && date <= self.ends_on
    }

    /// Returns whether this term has concluded relative to the evaluation date.
    #[must_use]
    pub fn is_concluded(&self, as_of: Date) -> bool {
        self.ends_on < as_of
    }

    /// Classifies this term relative to the evaluation date.
    #[must_use]
    pub fn phase(&self, as_of: Date) -> TermPhase {
        if self.ends_on < as_of {
            TermPhase::Concluded
        } else if self.starts_on > as_of {
            TermPhase::Future
        } else {
            TermPhase::Current
        }
    }
}

/// A top-level time range grouping an ordered set of terms.
///
/// At most one academic year should contain any given date; that is enforced
/// across a year set by [`crate::validate_years`], while the per-year
/// invariants (ordering, containment, non-overlap of terms) are enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicYear {
    /// The year identifier (e.g., 2025).
    year: u16,
    /// First day of the year range (inclusive).
    starts_on: Date,
    /// Last day of the year range (inclusive).
    ends_on: Date,
    /// Terms in chronological order.
    terms: Vec<Term>,
}

impl AcademicYear {
    /// Creates a new academic year.
    ///
    /// # Arguments
    ///
    /// * `year` - The year identifier
    /// * `starts_on` - First day of the year range (inclusive)
    /// * `ends_on` - Last day of the year range (inclusive)
    /// * `terms` - The terms, in chronological order
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The year's start date is after its end date
    /// - A term carries a different year identifier
    /// - A term extends outside the year range
    /// - Terms overlap or are not in chronological order
    pub fn new(
        year: u16,
        starts_on: Date,
        ends_on: Date,
        terms: Vec<Term>,
    ) -> Result<Self, DomainError> {
        if starts_on > ends_on {
            return Err(DomainError::InvalidYearBounds {
                year,
                starts_on,
                ends_on,
            });
        }

        for term in &terms {
            if term.year() != year {
                return Err(DomainError::TermYearMismatch {
                    term: term.id(),
                    expected: year,
                    actual: term.year(),
                });
            }
            if term.starts_on() < starts_on || term.ends_on() > ends_on {
                return Err(DomainError::TermOutsideYear {
                    term: term.id(),
                    year,
                });
            }
        }

        for pair in terms.windows(2) {
            if pair[1].starts_on() <= pair[0].ends_on() {
                return Err(DomainError::OverlappingTerms {
                    year,
                    first: pair[0].id(),
                    second: pair[1].id(),
                });
            }
        }

        Ok(Self {
            year,
            starts_on,
            ends_on,
            terms,
        })
    }

    /// Returns the year identifier.
    #[must_use]
    pub const fn year(&self) -> u16 {
        self.year
    }

    /// Returns the first day of the year range (inclusive).
    #[must_use]
    pub const fn starts_on(&self) -> Date {
        self.starts_on
    }

    /// Returns the last day of the year range (inclusive).
    #[must_use]
    pub const fn ends_on(&self) -> Date {
        self.ends_on
    }

    /// Returns the terms in chronological order.
    #[must_use]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Returns whether the given date falls within this year's range.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.starts_on <= date && date <= self.ends_on
    }
}

/// A pupil's snapshot-relevant attributes.
///
/// Owned and mutated by entity management; this engine only reads them, either
/// live (for non-concluded terms) or frozen inside a [`Snapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PupilAttributes {
    /// The class group the pupil is assigned to (e.g., "4B").
    pub class_group: String,
    /// The section or stream within the class group.
    pub section: String,
    /// The fee category used by billing.
    pub fee_category: String,
}

impl PupilAttributes {
    /// Creates a new attribute set.
    #[must_use]
    pub const fn new(class_group: String, section: String, fee_category: String) -> Self {
        Self {
            class_group,
            section,
            fee_category,
        }
    }
}

/// An immutable, persisted copy of a pupil's attributes for a concluded term.
///
/// A snapshot may exist only for a term that had concluded at write time, and
/// at most one snapshot exists per (pupil, term). Once persisted, the captured
/// attributes are never overwritten by live-attribute drift; only an explicit
/// repair may replace them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The (pupil, term) key.
    key: SnapshotKey,
    /// The captured attributes.
    attributes: PupilAttributes,
    /// When the snapshot was persisted (UTC).
    captured_at: OffsetDateTime,
    /// Whether the attributes were reconstructed from live data because true
    /// historical data at term conclusion was unavailable.
    reconstructed: bool,
}

impl Snapshot {
    /// Creates a new snapshot.
    ///
    /// # Arguments
    ///
    /// * `key` - The (pupil, term) key
    /// * `attributes` - The attributes to freeze
    /// * `captured_at` - The capture timestamp (UTC)
    /// * `reconstructed` - Whether the attributes are a best-effort
    ///   reconstruction rather than an accurate historical capture
    #[must_use]
    pub const fn new(
        key: SnapshotKey,
        attributes: PupilAttributes,
        captured_at: OffsetDateTime,
        reconstructed: bool,
    ) -> Self {
        Self {
            key,
            attributes,
            captured_at,
            reconstructed,
        }
    }

    /// Returns the (pupil, term) key.
    #[must_use]
    pub const fn key(&self) -> SnapshotKey {
        self.key
    }

    /// Returns the pupil this snapshot belongs to.
    #[must_use]
    pub const fn pupil(&self) -> PupilId {
        self.key.pupil
    }

    /// Returns the term this snapshot was taken for.
    #[must_use]
    pub const fn term(&self) -> TermId {
        self.key.term
    }

    /// Returns the captured attributes.
    #[must_use]
    pub const fn attributes(&self) -> &PupilAttributes {
        &self.attributes
    }

    /// Returns when the snapshot was persisted.
    #[must_use]
    pub const fn captured_at(&self) -> OffsetDateTime {
        self.captured_at
    }

    /// Returns whether the attributes were reconstructed from live data.
    #[must_use]
    pub const fn reconstructed(&self) -> bool {
        self.reconstructed
    }
}

/// A non-persisted view of a pupil's current attributes.
///
/// Returned whenever the queried term has not concluded. It has no identity of
/// its own and is recomputed on every query so it always reflects live state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VirtualSnapshot {
    /// The pupil the view belongs to.
    pub pupil: PupilId,
    /// The term the view was computed for.
    pub term: TermId,
    /// The pupil's current attributes at query time.
    pub attributes: PupilAttributes,
}

impl VirtualSnapshot {
    /// Creates a new virtual snapshot.
    #[must_use]
    pub const fn new(pupil: PupilId, term: TermId, attributes: PupilAttributes) -> Self {
        Self {
            pupil,
            term,
            attributes,
        }
    }
}
