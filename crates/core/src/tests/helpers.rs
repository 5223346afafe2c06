// Copyright (C) 2026 The termsnap developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used)]

use crate::{AttributesProvider, FixedClock, ProviderError};
use std::collections::BTreeMap;
use std::sync::atomic::AtomicUsize;
use termsnap_domain::{
    AcademicYear, PupilAttributes, PupilId, Snapshot, SnapshotKey, Term, TermId,
};
use termsnap_persistence::{InMemorySnapshotStore, SnapshotStore, StoreError};
use time::{Date, macros::date};

/// The 2025 calendar used throughout the lifecycle tests:
/// T1 Jan 1 - Apr 30, T2 May 1 - Aug 31, T3 Sep 1 - Dec 15, year ends Dec 31.
pub fn calendar() -> Vec<AcademicYear> {
    let term = |id: i64, start: Date, end: Date| {
        Term::new(TermId::new(id), 2025, format!("Term {id}"), start, end).unwrap()
    };
    vec![
        AcademicYear::new(
            2025,
            date!(2025 - 01 - 01),
            date!(2025 - 12 - 31),
            vec![
                term(1, date!(2025 - 01 - 01), date!(2025 - 04 - 30)),
                term(2, date!(2025 - 05 - 01), date!(2025 - 08 - 31)),
                term(3, date!(2025 - 09 - 01), date!(2025 - 12 - 15)),
            ],
        )
        .unwrap(),
    ]
}

/// A clock inside T2: T1 concluded, T2 current, T3 future.
pub const fn mid_year_clock() -> FixedClock {
    FixedClock::on(date!(2025 - 06 - 15))
}

/// A clock after T3: all three terms concluded.
pub const fn year_end_clock() -> FixedClock {
    FixedClock::on(date!(2025 - 12 - 20))
}

pub fn pupil_ids(count: i64) -> Vec<PupilId> {
    (1..=count).map(PupilId::new).collect()
}

pub fn live_attributes(pupil: PupilId) -> PupilAttributes {
    PupilAttributes::new(
        format!("live-{}", pupil.value()),
        String::from("A"),
        String::from("standard"),
    )
}

pub fn historical_attributes(pupil: PupilId) -> PupilAttributes {
    PupilAttributes::new(
        format!("hist-{}", pupil.value()),
        String::from("A"),
        String::from("standard"),
    )
}

/// A map-backed provider with configurable attribute history and failure
/// injection.
#[derive(Debug, Default)]
pub struct TestProvider {
    current: BTreeMap<PupilId, PupilAttributes>,
    history: BTreeMap<PupilId, PupilAttributes>,
    unavailable: bool,
}

impl TestProvider {
    /// A provider knowing pupils `1..=count`, without attribute history.
    pub fn with_pupils(count: i64) -> Self {
        let current: BTreeMap<PupilId, PupilAttributes> = (1..=count)
            .map(PupilId::new)
            .map(|pupil| (pupil, live_attributes(pupil)))
            .collect();
        Self {
            current,
            history: BTreeMap::new(),
            unavailable: false,
        }
    }

    /// Adds attribute history for every known pupil.
    pub fn with_full_history(mut self) -> Self {
        self.history = self
            .current
            .keys()
            .map(|pupil| (*pupil, historical_attributes(*pupil)))
            .collect();
        self
    }

    /// Moves a pupil to a different class group.
    pub fn with_class_group(mut self, pupil: i64, class_group: &str) -> Self {
        if let Some(attributes) = self.current.get_mut(&PupilId::new(pupil)) {
            attributes.class_group = class_group.to_string();
        }
        self
    }

    /// Adds attribute history for a single pupil.
    pub fn with_history_for(mut self, pupil: i64) -> Self {
        let pupil: PupilId = PupilId::new(pupil);
        self.history.insert(pupil, historical_attributes(pupil));
        self
    }

    /// A provider that fails every call.
    pub const fn down() -> Self {
        Self {
            current: BTreeMap::new(),
            history: BTreeMap::new(),
            unavailable: true,
        }
    }
}

impl AttributesProvider for TestProvider {
    fn current_attributes(&self, pupil: PupilId) -> Result<PupilAttributes, ProviderError> {
        if self.unavailable {
            return Err(ProviderError::Unavailable {
                message: String::from("provider down"),
            });
        }
        self.current
            .get(&pupil)
            .cloned()
            .ok_or(ProviderError::PupilNotFound(pupil))
    }

    fn attributes_as_of(
        &self,
        pupil: PupilId,
        as_of: Date,
    ) -> Result<PupilAttributes, ProviderError> {
        if self.unavailable {
            return Err(ProviderError::Unavailable {
                message: String::from("provider down"),
            });
        }
        self.history
            .get(&pupil)
            .cloned()
            .ok_or(ProviderError::HistoryUnavailable { pupil, as_of })
    }
}

/// A store wrapper counting `put` calls, for asserting that virtual reads
/// never write.
#[derive(Debug, Default)]
pub struct CountingStore {
    pub inner: InMemorySnapshotStore,
    pub puts: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl SnapshotStore for CountingStore {
    fn get(&self, key: SnapshotKey) -> Result<Option<Snapshot>, StoreError> {
        self.inner.get(key)
    }

    fn put(&self, snapshot: Snapshot, overwrite: bool) -> Result<(), StoreError> {
        self.puts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.inner.put(snapshot, overwrite)
    }

    fn delete(&self, key: SnapshotKey) -> Result<(), StoreError> {
        self.inner.delete(key)
    }

    fn list_by_term(&self, term: TermId) -> Result<Vec<Snapshot>, StoreError> {
        self.inner.list_by_term(term)
    }

    fn keys(&self) -> Result<Vec<SnapshotKey>, StoreError> {
        self.inner.keys()
    }
}
