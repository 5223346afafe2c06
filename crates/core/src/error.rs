// Copyright (C) 2026 The termsnap developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::provider::ProviderError;
use termsnap_domain::{DomainError, TermId};
use termsnap_persistence::StoreError;

/// Errors that can occur during snapshot lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The term calendar is malformed. Fatal: temporal reasoning is not
    /// well-defined over a malformed calendar.
    Domain(DomainError),
    /// The snapshot store failed.
    Store(StoreError),
    /// The live-attributes provider failed.
    Provider(ProviderError),
    /// The requested term is not present in the configured academic years.
    TermNotFound(TermId),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Domain(err) => write!(f, "Calendar configuration error: {err}"),
            Self::Store(err) => write!(f, "Snapshot store error: {err}"),
            Self::Provider(err) => write!(f, "Attributes provider error: {err}"),
            Self::TermNotFound(term) => {
                write!(f, "Term {term} is not present in the configured academic years")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<ProviderError> for CoreError {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err)
    }
}
