// Copyright (C) 2026 The termsnap developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Snapshot lifecycle management.
//!
//! Decides, for any (pupil, term) pair, whether a persisted historical
//! snapshot or a freshly computed live view answers a query, and keeps the
//! persisted population complete (coverage auditing, bulk repair) and valid
//! (cleanup of snapshots held for non-concluded terms).

mod cancel;
mod clock;
mod error;
mod lifecycle;
mod provider;

#[cfg(test)]
mod tests;

pub use cancel::CancelToken;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::CoreError;
pub use lifecycle::{EffectiveSnapshot, SnapshotLifecycle};
pub use provider::{AttributesProvider, ProviderError};
