// Copyright (C) 2026 The termsnap developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use termsnap_domain::SnapshotKey;

/// Errors that can occur during snapshot store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A snapshot already exists for the key and overwrite was not requested.
    Conflict {
        /// The key of the existing snapshot.
        key: SnapshotKey,
    },
    /// No snapshot exists for the key.
    SnapshotNotFound {
        /// The key that was requested.
        key: SnapshotKey,
    },
    /// The storage backend failed.
    Backend(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conflict { key } => {
                write!(f, "A snapshot already exists for {key}")
            }
            Self::SnapshotNotFound { key } => {
                write!(f, "No snapshot found for {key}")
            }
            Self::Backend(msg) => write!(f, "Snapshot store backend error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}
