// Copyright (C) 2026 The termsnap developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::{Date, OffsetDateTime};

/// The reference clock used to evaluate temporal status.
///
/// Injectable so that tests and "as of" queries can pin the evaluation
/// instant instead of trusting the wall clock.
pub trait Clock: Send + Sync {
    /// Returns the current instant (UTC).
    fn now(&self) -> OffsetDateTime;

    /// Returns the current civil date (UTC).
    fn today(&self) -> Date {
        self.now().date()
    }
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    /// The instant this clock always reports.
    at: OffsetDateTime,
}

impl FixedClock {
    /// Creates a clock pinned to the given instant.
    #[must_use]
    pub const fn at(at: OffsetDateTime) -> Self {
        Self { at }
    }

    /// Creates a clock pinned to midnight UTC on the given date.
    #[must_use]
    pub const fn on(date: Date) -> Self {
        Self {
            at: date.midnight().assume_utc(),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.at
    }
}
