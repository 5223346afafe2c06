// Copyright (C) 2026 The termsnap developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use termsnap_domain::{PupilAttributes, PupilId};
use time::Date;

/// Errors reported by an attributes provider.
///
/// Provider failures are always propagated: a snapshot must never be
/// fabricated from absent data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider could not be reached or failed internally.
    Unavailable {
        /// A description of the failure.
        message: String,
    },
    /// The pupil is not known to the provider.
    PupilNotFound(PupilId),
    /// The provider holds no attribute history for the pupil at the
    /// requested date. Recoverable by the force-repair path, which
    /// substitutes live attributes under a lower-confidence marker.
    HistoryUnavailable {
        /// The pupil whose history was requested.
        pupil: PupilId,
        /// The date the history was requested for.
        as_of: Date,
    },
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable { message } => {
                write!(f, "Attributes provider unavailable: {message}")
            }
            Self::PupilNotFound(pupil) => write!(f, "Pupil {pupil} not found"),
            Self::HistoryUnavailable { pupil, as_of } => {
                write!(
                    f,
                    "No attribute history available for pupil {pupil} as of {as_of}"
                )
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// The live-attributes seam supplied by entity management.
///
/// The engine only ever reads through this trait; it never mutates pupil
/// data.
pub trait AttributesProvider: Send + Sync {
    /// Returns the pupil's current attributes.
    ///
    /// # Errors
    ///
    /// Returns an error if the pupil is unknown or the provider fails.
    fn current_attributes(&self, pupil: PupilId) -> Result<PupilAttributes, ProviderError>;

    /// Returns the pupil's attributes as they were on the given date.
    ///
    /// Providers without an attribute history keep the default body, which
    /// reports [`ProviderError::HistoryUnavailable`]; the force-repair path
    /// then recovers by substituting live attributes.
    ///
    /// # Errors
    ///
    /// Returns an error if no historical record exists for the date, the
    /// pupil is unknown, or the provider fails.
    fn attributes_as_of(
        &self,
        pupil: PupilId,
        as_of: Date,
    ) -> Result<PupilAttributes, ProviderError> {
        Err(ProviderError::HistoryUnavailable { pupil, as_of })
    }
}
