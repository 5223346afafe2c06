// Copyright (C) 2026 The termsnap developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Term resolution.
//!
//! Given the configured academic years and an evaluation date, derives which
//! term is current, which terms bound the evaluation date, and whether the
//! date falls in a recess or a holiday. Nothing here consults stored
//! "is current" flags; the evaluation date is the only source of truth, so the
//! answer can never go stale against the clock.

use crate::error::DomainError;
use crate::recess::{RecessKind, recess_containing};
use crate::types::{AcademicYear, Term, TermId, TermPhase};
use std::collections::BTreeMap;
use time::Date;

/// The temporal status of an evaluation date against the term calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermStatus<'a> {
    /// The term containing the evaluation date, if any.
    pub current: Option<&'a Term>,
    /// The term immediately before the evaluation date, if any.
    pub previous: Option<&'a Term>,
    /// The term immediately after the evaluation date, if any.
    pub next: Option<&'a Term>,
    /// Whether the date falls in a mid-term recess.
    pub in_recess: bool,
    /// Whether the date falls outside term time for any other reason
    /// (before the first term, after the last term, or outside every year).
    pub in_holiday: bool,
}

impl TermStatus<'_> {
    const fn holiday() -> Self {
        Self {
            current: None,
            previous: None,
            next: None,
            in_recess: false,
            in_holiday: true,
        }
    }
}

/// Resolves the temporal status of an evaluation date.
///
/// Selects the academic year whose range contains `as_of`, then scans its
/// terms. When no term contains the date, the surrounding recess classifies
/// the result: a mid-term gap sets `in_recess`, everything else counts as
/// holiday. `previous` and `next` are the chronologically adjacent terms; at
/// the end of a year, `next` reaches into the first term of the
/// chronologically next year when one is configured.
///
/// # Errors
///
/// Returns an error if date arithmetic overflows during recess derivation.
pub fn resolve<'a>(
    years: &'a [AcademicYear],
    as_of: Date,
) -> Result<TermStatus<'a>, DomainError> {
    let Some(year) = years.iter().find(|y| y.contains(as_of)) else {
        return Ok(TermStatus::holiday());
    };

    let terms: &[Term] = year.terms();
    let Some(first) = terms.first() else {
        return Ok(TermStatus::holiday());
    };

    for (index, term) in terms.iter().enumerate() {
        if term.contains(as_of) {
            return Ok(TermStatus {
                current: Some(term),
                previous: index.checked_sub(1).and_then(|i| terms.get(i)),
                next: terms.get(index + 1),
                in_recess: false,
                in_holiday: false,
            });
        }
    }

    if as_of < first.starts_on() {
        return Ok(TermStatus {
            current: None,
            previous: None,
            next: Some(first),
            in_recess: false,
            in_holiday: true,
        });
    }

    let in_recess = recess_containing(year, as_of)?
        .is_some_and(|recess| recess.kind == RecessKind::MidTerm);

    let previous: Option<&Term> = terms.iter().rev().find(|t| t.ends_on() < as_of);
    let next: Option<&Term> = terms
        .iter()
        .find(|t| t.starts_on() > as_of)
        .or_else(|| first_term_of_next_year(years, year));

    Ok(TermStatus {
        current: None,
        previous,
        next,
        in_recess,
        in_holiday: !in_recess,
    })
}

/// Finds the first term of the year chronologically following `after`.
fn first_term_of_next_year<'a>(
    years: &'a [AcademicYear],
    after: &AcademicYear,
) -> Option<&'a Term> {
    years
        .iter()
        .filter(|y| y.starts_on() > after.ends_on())
        .min_by_key(|y| y.starts_on())
        .and_then(|y| y.terms().first())
}

/// Finds a term by identifier across all configured years.
#[must_use]
pub fn find_term<'a>(
    years: &'a [AcademicYear],
    id: TermId,
) -> Option<(&'a AcademicYear, &'a Term)> {
    years.iter().find_map(|year| {
        year.terms()
            .iter()
            .find(|term| term.id() == id)
            .map(|term| (year, term))
    })
}

/// Returns every term that has concluded relative to the evaluation date,
/// across all configured years, in chronological order.
#[must_use]
pub fn concluded_terms<'a>(years: &'a [AcademicYear], as_of: Date) -> Vec<&'a Term> {
    let mut terms: Vec<&Term> = years
        .iter()
        .flat_map(AcademicYear::terms)
        .filter(|term| term.is_concluded(as_of))
        .collect();
    terms.sort_by_key(|term| term.starts_on());
    terms
}

/// Builds a term classification map for the evaluation date.
///
/// Used by callers that need to hand a temporal classification to components
/// that must not reason about time themselves (the snapshot store).
#[must_use]
pub fn phase_map(years: &[AcademicYear], as_of: Date) -> BTreeMap<TermId, TermPhase> {
    years
        .iter()
        .flat_map(AcademicYear::terms)
        .map(|term| (term.id(), term.phase(as_of)))
        .collect()
}
