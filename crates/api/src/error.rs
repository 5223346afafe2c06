// Copyright (C) 2026 The termsnap developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use termsnap::{CoreError, ProviderError};
use termsnap_domain::{DomainError, PupilId, TermId};
use termsnap_persistence::StoreError;

/// Errors surfaced at the API boundary.
///
/// Flattens the internal error taxonomy into the shapes a consuming surface
/// needs to distinguish: not-found conditions, upstream outages, calendar
/// misconfiguration, and storage failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The requested term is not present in the configured academic years.
    UnknownTerm(TermId),
    /// The requested pupil is not known to the attributes provider.
    UnknownPupil(PupilId),
    /// The attributes provider could not answer.
    ProviderUnavailable {
        /// Provider failure detail.
        message: String,
    },
    /// The configured academic years are malformed.
    CalendarInvalid(DomainError),
    /// The snapshot store failed.
    StoreFailure(StoreError),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTerm(term) => write!(f, "Unknown term: {term}"),
            Self::UnknownPupil(pupil) => write!(f, "Unknown pupil: {pupil}"),
            Self::ProviderUnavailable { message } => {
                write!(f, "Attributes provider unavailable: {message}")
            }
            Self::CalendarInvalid(err) => write!(f, "Invalid academic calendar: {err}"),
            Self::StoreFailure(err) => write!(f, "Snapshot store failure: {err}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::TermNotFound(term) => Self::UnknownTerm(term),
            CoreError::Provider(ProviderError::PupilNotFound(pupil)) => Self::UnknownPupil(pupil),
            CoreError::Provider(err) => Self::ProviderUnavailable {
                message: err.to_string(),
            },
            CoreError::Domain(err) => Self::CalendarInvalid(err),
            CoreError::Store(err) => Self::StoreFailure(err),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::CalendarInvalid(err)
    }
}
