// Copyright (C) 2026 The termsnap developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Display-term selection.
//!
//! School-facing screens always show a term, even during a recess or a
//! holiday when no term is in session. The selection prefers the term
//! containing the evaluation date, then the most recently ended term, and
//! only falls back to scanning every concluded term when the resolver has
//! no neighbor to offer.

use termsnap_domain::{
    AcademicYear, DomainError, Term, concluded_terms, find_term, resolve, validate_years,
};
use time::Date;

/// Why a particular term was chosen for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayReason {
    /// The evaluation date falls inside the displayed term.
    InSession,
    /// The date falls in a mid-term recess; the term before the recess is
    /// shown.
    RecessShowingPrevious,
    /// The date falls in a holiday; the most recently ended term in the
    /// containing year is shown.
    HolidayShowingPrevious,
    /// No containing year or neighboring term exists; the most recent
    /// concluded term across all years is shown, if any.
    FallbackMostRecentConcluded,
}

impl DisplayReason {
    /// Returns a short human-readable label for the selection.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InSession => "in session",
            Self::RecessShowingPrevious => "recess (showing previous term)",
            Self::HolidayShowingPrevious => "holiday (showing previous term)",
            Self::FallbackMostRecentConcluded => "fallback (most recent concluded term)",
        }
    }
}

/// The term chosen for display, its academic year, and why it was chosen.
///
/// `term` is `None` only in the fallback case with no concluded term at
/// all, which arises before the very first term ever configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermDisplay<'a> {
    /// The displayed term.
    pub term: Option<&'a Term>,
    /// The academic year containing the displayed term.
    pub year: Option<&'a AcademicYear>,
    /// Why this term was selected.
    pub reason: DisplayReason,
}

/// Selects the term to display for an evaluation date.
///
/// # Errors
///
/// Returns an error if the calendar is malformed or date arithmetic
/// overflows during recess derivation.
pub fn effective_display_term(
    years: &[AcademicYear],
    as_of: Date,
) -> Result<TermDisplay<'_>, DomainError> {
    validate_years(years)?;
    let status = resolve(years, as_of)?;

    if let Some(term) = status.current {
        return Ok(TermDisplay {
            term: Some(term),
            year: year_of(years, term),
            reason: DisplayReason::InSession,
        });
    }

    if let Some(term) = status.previous {
        let reason = if status.in_recess {
            DisplayReason::RecessShowingPrevious
        } else {
            DisplayReason::HolidayShowingPrevious
        };
        return Ok(TermDisplay {
            term: Some(term),
            year: year_of(years, term),
            reason,
        });
    }

    let latest: Option<&Term> = concluded_terms(years, as_of).last().copied();
    Ok(TermDisplay {
        term: latest,
        year: latest.and_then(|term| year_of(years, term)),
        reason: DisplayReason::FallbackMostRecentConcluded,
    })
}

fn year_of<'a>(years: &'a [AcademicYear], term: &Term) -> Option<&'a AcademicYear> {
    find_term(years, term.id()).map(|(year, _)| year)
}
