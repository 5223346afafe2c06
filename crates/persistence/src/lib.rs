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

//! Snapshot persistence.
//!
//! This crate owns the keyed store contract for persisted snapshots and the
//! in-memory reference backend. Storage technology is a collaborator concern;
//! the contract has no opinion on schema beyond the (pupil, term) key shape,
//! and it performs no temporal reasoning. The caller is trusted to request
//! writes only for concluded terms; the conditional `put` is the one
//! concession to concurrency, so racing lazy creators cannot both win.

mod error;
mod memory;
mod store;

#[cfg(test)]
mod tests;

pub use error::StoreError;
pub use memory::InMemorySnapshotStore;
pub use store::SnapshotStore;
