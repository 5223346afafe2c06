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
    clippy::all
)]

//! API boundary layer.
//!
//! Wraps the lifecycle manager behind a query façade so consuming surfaces
//! (HTTP handlers, admin tooling) never reach into the store or the term
//! resolver directly, and translates internal errors into the boundary
//! error taxonomy.

mod display;
mod error;
mod facade;

#[cfg(test)]
mod tests;

pub use display::{DisplayReason, TermDisplay, effective_display_term};
pub use error::ApiError;
pub use facade::{EffectiveAttributes, SnapshotQueries};
