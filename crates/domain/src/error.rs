// Copyright (C) 2026 The termsnap developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::TermId;
use time::Date;

/// Errors that can occur while constructing or validating the term calendar.
///
/// All of these are configuration-level failures: temporal reasoning is not
/// well-defined over a malformed calendar, so operations abort on them rather
/// than recovering per item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A term's start date is after its end date.
    InvalidTermBounds {
        /// The offending term.
        term: TermId,
        /// The term's start date.
        starts_on: Date,
        /// The term's end date.
        ends_on: Date,
    },
    /// An academic year's start date is after its end date.
    InvalidYearBounds {
        /// The year identifier.
        year: u16,
        /// The year's start date.
        starts_on: Date,
        /// The year's end date.
        ends_on: Date,
    },
    /// A term extends outside the bounds of its academic year.
    TermOutsideYear {
        /// The offending term.
        term: TermId,
        /// The year the term belongs to.
        year: u16,
    },
    /// A term was assigned to one academic year but carries another.
    TermYearMismatch {
        /// The offending term.
        term: TermId,
        /// The year of the containing `AcademicYear`.
        expected: u16,
        /// The year recorded on the term.
        actual: u16,
    },
    /// Two terms within the same academic year overlap or are out of order.
    OverlappingTerms {
        /// The year containing the terms.
        year: u16,
        /// The earlier term of the offending pair.
        first: TermId,
        /// The later term of the offending pair.
        second: TermId,
    },
    /// Two academic years cover overlapping date ranges.
    OverlappingYears {
        /// One year of the offending pair.
        first: u16,
        /// The other year of the offending pair.
        second: u16,
    },
    /// The same academic year was configured twice.
    DuplicateYear(u16),
    /// The same term identifier appears in more than one academic year.
    DuplicateTermId {
        /// The duplicated term identifier.
        term: TermId,
        /// The year of the first occurrence.
        first_year: u16,
        /// The year of the second occurrence.
        second_year: u16,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTermBounds {
                term,
                starts_on,
                ends_on,
            } => {
                write!(
                    f,
                    "Term {term} starts on {starts_on} but ends on {ends_on}"
                )
            }
            Self::InvalidYearBounds {
                year,
                starts_on,
                ends_on,
            } => {
                write!(
                    f,
                    "Academic year {year} starts on {starts_on} but ends on {ends_on}"
                )
            }
            Self::TermOutsideYear { term, year } => {
                write!(f, "Term {term} extends outside academic year {year}")
            }
            Self::TermYearMismatch {
                term,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Term {term} carries year {actual} but belongs to academic year {expected}"
                )
            }
            Self::OverlappingTerms {
                year,
                first,
                second,
            } => {
                write!(
                    f,
                    "Terms {first} and {second} in academic year {year} overlap or are not in chronological order"
                )
            }
            Self::OverlappingYears { first, second } => {
                write!(f, "Academic years {first} and {second} overlap")
            }
            Self::DuplicateYear(year) => {
                write!(f, "Academic year {year} is configured more than once")
            }
            Self::DuplicateTermId {
                term,
                first_year,
                second_year,
            } => {
                write!(
                    f,
                    "Term {term} appears in both academic year {first_year} and academic year {second_year}"
                )
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
