// Copyright (C) 2026 The termsnap developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Cross-year calendar validation.
//!
//! Per-year invariants are enforced by [`AcademicYear::new`]; this module
//! checks the invariants that only hold across a whole year set. Lifecycle
//! operations run this once at entry and abort on failure, since none of the
//! temporal reasoning is well-defined over a malformed calendar.

use crate::error::DomainError;
use crate::types::{AcademicYear, TermId};
use std::collections::BTreeMap;

/// Validates a set of academic years as a whole.
///
/// # Errors
///
/// Returns an error if:
/// - The same year identifier is configured twice
/// - Two years cover overlapping date ranges
/// - The same term identifier appears in more than one year
pub fn validate_years(years: &[AcademicYear]) -> Result<(), DomainError> {
    let mut seen_terms: BTreeMap<TermId, u16> = BTreeMap::new();

    for (index, year) in years.iter().enumerate() {
        for other in &years[index + 1..] {
            if other.year() == year.year() {
                return Err(DomainError::DuplicateYear(year.year()));
            }
            if other.starts_on() <= year.ends_on() && year.starts_on() <= other.ends_on() {
                return Err(DomainError::OverlappingYears {
                    first: year.year(),
                    second: other.year(),
                });
            }
        }

        for term in year.terms() {
            if let Some(first_year) = seen_terms.insert(term.id(), year.year()) {
                return Err(DomainError::DuplicateTermId {
                    term: term.id(),
                    first_year,
                    second_year: year.year(),
                });
            }
        }
    }

    Ok(())
}
