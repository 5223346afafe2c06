// Copyright (C) 2026 The termsnap developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used)]

use crate::{ApiError, DisplayReason, SnapshotQueries, effective_display_term};
use std::collections::BTreeMap;
use termsnap::{AttributesProvider, CancelToken, FixedClock, ProviderError};
use termsnap_domain::{AcademicYear, PupilAttributes, PupilId, Term, TermId};
use termsnap_persistence::InMemorySnapshotStore;
use time::{Date, macros::date};

fn term(id: i64, start: Date, end: Date) -> Term {
    Term::new(TermId::new(id), 2025, format!("Term {id}"), start, end).unwrap()
}

/// T1 Jan 1 - Apr 30, T2 May 10 - Aug 31, T3 Sep 1 - Dec 15. The gap between
/// T1 and T2 is a mid-term recess.
fn calendar() -> Vec<AcademicYear> {
    vec![
        AcademicYear::new(
            2025,
            date!(2025 - 01 - 01),
            date!(2025 - 12 - 31),
            vec![
                term(1, date!(2025 - 01 - 01), date!(2025 - 04 - 30)),
                term(2, date!(2025 - 05 - 10), date!(2025 - 08 - 31)),
                term(3, date!(2025 - 09 - 01), date!(2025 - 12 - 15)),
            ],
        )
        .unwrap(),
    ]
}

#[derive(Debug, Default)]
struct RosterProvider {
    roster: BTreeMap<PupilId, PupilAttributes>,
}

impl RosterProvider {
    fn with_pupils(count: i64) -> Self {
        let roster = (1..=count)
            .map(PupilId::new)
            .map(|pupil| {
                (
                    pupil,
                    PupilAttributes::new(
                        format!("class-{}", pupil.value()),
                        String::from("A"),
                        String::from("standard"),
                    ),
                )
            })
            .collect();
        Self { roster }
    }
}

impl AttributesProvider for RosterProvider {
    fn current_attributes(&self, pupil: PupilId) -> Result<PupilAttributes, ProviderError> {
        self.roster
            .get(&pupil)
            .cloned()
            .ok_or(ProviderError::PupilNotFound(pupil))
    }
}

#[test]
fn test_display_term_in_session() {
    let years = calendar();
    let display = effective_display_term(&years, date!(2025 - 06 - 15)).unwrap();

    assert_eq!(display.term.unwrap().id(), TermId::new(2));
    assert_eq!(display.year.unwrap().year(), 2025);
    assert_eq!(display.reason, DisplayReason::InSession);
}

#[test]
fn test_display_term_in_recess_shows_previous() {
    let years = calendar();
    let display = effective_display_term(&years, date!(2025 - 05 - 05)).unwrap();

    assert_eq!(display.term.unwrap().id(), TermId::new(1));
    assert_eq!(display.reason, DisplayReason::RecessShowingPrevious);
}

#[test]
fn test_display_term_in_holiday_shows_previous() {
    let years = calendar();
    let display = effective_display_term(&years, date!(2025 - 12 - 20)).unwrap();

    assert_eq!(display.term.unwrap().id(), TermId::new(3));
    assert_eq!(display.reason, DisplayReason::HolidayShowingPrevious);
}

#[test]
fn test_display_term_falls_back_to_most_recent_concluded() {
    // The date is outside every configured year, so the resolver has no
    // previous term to offer; the fallback scans all concluded terms.
    let years = calendar();
    let display = effective_display_term(&years, date!(2026 - 03 - 01)).unwrap();

    assert_eq!(display.term.unwrap().id(), TermId::new(3));
    assert_eq!(display.reason, DisplayReason::FallbackMostRecentConcluded);
}

#[test]
fn test_display_term_with_nothing_concluded_yields_no_term() {
    let years = calendar();
    let display = effective_display_term(&years, date!(2024 - 06 - 01)).unwrap();

    assert!(display.term.is_none());
    assert!(display.year.is_none());
    assert_eq!(display.reason, DisplayReason::FallbackMostRecentConcluded);
}

#[test]
fn test_display_reason_labels() {
    assert_eq!(DisplayReason::InSession.as_str(), "in session");
    assert_eq!(
        DisplayReason::RecessShowingPrevious.as_str(),
        "recess (showing previous term)"
    );
    assert_eq!(
        DisplayReason::HolidayShowingPrevious.as_str(),
        "holiday (showing previous term)"
    );
    assert_eq!(
        DisplayReason::FallbackMostRecentConcluded.as_str(),
        "fallback (most recent concluded term)"
    );
}

#[test]
fn test_effective_attributes_for_current_term_is_live() {
    let store = InMemorySnapshotStore::new();
    let provider = RosterProvider::with_pupils(1);
    let clock = FixedClock::on(date!(2025 - 06 - 15));
    let queries = SnapshotQueries::new(&store, &provider, &clock);

    let effective = queries
        .effective_attributes(&calendar(), PupilId::new(1), TermId::new(2))
        .unwrap();

    assert!(effective.live_view);
    assert!(!effective.reconstructed);
    assert_eq!(effective.attributes.class_group, "class-1");
}

#[test]
fn test_effective_attributes_for_concluded_term_is_persisted() {
    let store = InMemorySnapshotStore::new();
    let provider = RosterProvider::with_pupils(1);
    let clock = FixedClock::on(date!(2025 - 06 - 15));
    let queries = SnapshotQueries::new(&store, &provider, &clock);

    let effective = queries
        .effective_attributes(&calendar(), PupilId::new(1), TermId::new(1))
        .unwrap();

    assert!(!effective.live_view);
    assert!(effective.reconstructed);
}

#[test]
fn test_unknown_term_maps_to_api_error() {
    let store = InMemorySnapshotStore::new();
    let provider = RosterProvider::with_pupils(1);
    let clock = FixedClock::on(date!(2025 - 06 - 15));
    let queries = SnapshotQueries::new(&store, &provider, &clock);

    let err = queries
        .effective_attributes(&calendar(), PupilId::new(1), TermId::new(99))
        .unwrap_err();

    assert_eq!(err, ApiError::UnknownTerm(TermId::new(99)));
}

#[test]
fn test_unknown_pupil_maps_to_api_error() {
    let store = InMemorySnapshotStore::new();
    let provider = RosterProvider::with_pupils(1);
    let clock = FixedClock::on(date!(2025 - 06 - 15));
    let queries = SnapshotQueries::new(&store, &provider, &clock);

    let err = queries
        .effective_attributes(&calendar(), PupilId::new(7), TermId::new(2))
        .unwrap_err();

    assert_eq!(err, ApiError::UnknownPupil(PupilId::new(7)));
}

#[test]
fn test_display_term_uses_the_injected_clock() {
    let store = InMemorySnapshotStore::new();
    let provider = RosterProvider::with_pupils(1);
    let clock = FixedClock::on(date!(2025 - 12 - 20));
    let queries = SnapshotQueries::new(&store, &provider, &clock);

    let years = calendar();
    let display = queries.effective_display_term(&years).unwrap();

    assert_eq!(display.term.unwrap().id(), TermId::new(3));
    assert_eq!(display.reason, DisplayReason::HolidayShowingPrevious);
}

#[test]
fn test_admin_operations_delegate_to_the_lifecycle() {
    let store = InMemorySnapshotStore::new();
    let provider = RosterProvider::with_pupils(2);
    let clock = FixedClock::on(date!(2025 - 12 - 20));
    let queries = SnapshotQueries::new(&store, &provider, &clock);

    let years = calendar();
    let pupils = vec![PupilId::new(1), PupilId::new(2)];

    let coverage = queries.check_coverage(&pupils, &years).unwrap();
    assert_eq!(coverage.expected, 6);

    let report = queries
        .force_create_all_missing(&pupils, &years, &CancelToken::new())
        .unwrap();
    assert_eq!(report.snapshots_created, 6);

    let completeness = queries.validate_completeness(&pupils, &years).unwrap();
    assert!(completeness.passed);

    let stats = queries.stats_by_term_status(&years).unwrap();
    assert_eq!(stats.concluded, 6);
    assert!(stats.is_healthy());
}
