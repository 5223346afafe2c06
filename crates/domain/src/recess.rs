// Copyright (C) 2026 The termsnap developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Recess derivation.
//!
//! A recess is a date interval within an academic year not covered by any
//! term: either a gap between two consecutive terms, or the tail of the year
//! after its last term. Recesses are derived, never stored.
//!
//! Terms that touch (no free day between them) produce no recess. A year with
//! misconfigured touching-or-inverted gaps is a tolerated data-quality case,
//! not an error.

use crate::error::DomainError;
use crate::types::{AcademicYear, Term};
use serde::Serialize;
use time::{Date, Duration};

/// The kind of a recess interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecessKind {
    /// A gap between two consecutive terms of the same year.
    MidTerm,
    /// The interval after the last term, up to the end of the year range.
    EndOfYear,
}

impl RecessKind {
    /// Converts this kind to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MidTerm => "mid-term",
            Self::EndOfYear => "end-of-year",
        }
    }
}

/// A derived recess interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recess {
    /// First free day (inclusive).
    pub starts_on: Date,
    /// Last free day (inclusive).
    pub ends_on: Date,
    /// Number of free days in the interval.
    pub days: i64,
    /// The kind of recess.
    pub kind: RecessKind,
}

impl Recess {
    /// Returns whether the given date falls within this recess.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.starts_on <= date && date <= self.ends_on
    }
}

/// Derives all recess intervals of an academic year.
///
/// For each pair of consecutive terms, a [`RecessKind::MidTerm`] recess is
/// emitted when at least one free day separates them. When the year range
/// extends past the last term, a [`RecessKind::EndOfYear`] recess covers the
/// tail. A year without terms yields no recesses.
///
/// # Errors
///
/// Returns an error if date arithmetic overflows.
pub fn recesses(year: &AcademicYear) -> Result<Vec<Recess>, DomainError> {
    let terms: &[Term] = year.terms();
    let mut result: Vec<Recess> = Vec::new();

    for pair in terms.windows(2) {
        let free_days: i64 = (pair[1].starts_on() - pair[0].ends_on()).whole_days() - 1;
        if free_days <= 0 {
            continue;
        }

        result.push(Recess {
            starts_on: day_after(pair[0].ends_on())?,
            ends_on: day_before(pair[1].starts_on())?,
            days: free_days,
            kind: RecessKind::MidTerm,
        });
    }

    if let Some(last) = terms.last() {
        let tail_days: i64 = (year.ends_on() - last.ends_on()).whole_days();
        if tail_days > 0 {
            result.push(Recess {
                starts_on: day_after(last.ends_on())?,
                ends_on: year.ends_on(),
                days: tail_days,
                kind: RecessKind::EndOfYear,
            });
        }
    }

    Ok(result)
}

/// Finds the recess containing the given date, if any.
///
/// # Errors
///
/// Returns an error if date arithmetic overflows.
pub fn recess_containing(
    year: &AcademicYear,
    as_of: Date,
) -> Result<Option<Recess>, DomainError> {
    Ok(recesses(year)?.into_iter().find(|r| r.contains(as_of)))
}

fn day_after(date: Date) -> Result<Date, DomainError> {
    date.checked_add(Duration::days(1))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("finding the day after {date}"),
        })
}

fn day_before(date: Date) -> Result<Date, DomainError> {
    date.checked_sub(Duration::days(1))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("finding the day before {date}"),
        })
}
