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

mod error;
mod recess;
mod resolver;
mod types;
mod validation;

pub use error::DomainError;
pub use recess::{Recess, RecessKind, recess_containing, recesses};
pub use resolver::{TermStatus, concluded_terms, find_term, phase_map, resolve};
pub use types::{
    AcademicYear, PupilAttributes, PupilId, Snapshot, SnapshotKey, Term, TermId, TermPhase,
    VirtualSnapshot,
};
pub use validation::validate_years;
