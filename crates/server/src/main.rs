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
#![allow(clippy::multiple_crate_versions)]
// Handlers are async for axum's sake; the engine itself is synchronous.
#![allow(clippy::unused_async)]

mod config;

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use config::ConfigFile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use termsnap::{AttributesProvider, CancelToken, ProviderError, SystemClock};
use termsnap_api::{ApiError, EffectiveAttributes, SnapshotQueries, TermDisplay};
use termsnap_audit::{
    CleanupReport, CompletenessReport, CoverageReport, ForceRepairReport, ItemFailure,
    RepairReport, SnapshotStats,
};
use termsnap_domain::{AcademicYear, PupilAttributes, PupilId, SnapshotKey, TermId};
use termsnap_persistence::{InMemorySnapshotStore, StoreError};
use tracing::{error, info};

/// termsnap server - HTTP server for the termsnap snapshot engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON configuration file (term calendar and pupil roster).
    #[arg(short, long)]
    config: String,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Attributes provider backed by the configured pupil roster.
///
/// The roster carries no attribute history, so accurate repair reports every
/// item as failed and forced repair recovers them from live attributes.
#[derive(Debug)]
struct RosterProvider {
    roster: BTreeMap<PupilId, PupilAttributes>,
}

impl AttributesProvider for RosterProvider {
    fn current_attributes(&self, pupil: PupilId) -> Result<PupilAttributes, ProviderError> {
        self.roster
            .get(&pupil)
            .cloned()
            .ok_or(ProviderError::PupilNotFound(pupil))
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    store: InMemorySnapshotStore,
    provider: RosterProvider,
    clock: SystemClock,
    years: Vec<AcademicYear>,
    pupils: Vec<PupilId>,
}

impl AppState {
    fn new(years: Vec<AcademicYear>, roster: BTreeMap<PupilId, PupilAttributes>) -> Self {
        let pupils: Vec<PupilId> = roster.keys().copied().collect();
        Self {
            inner: Arc::new(Inner {
                store: InMemorySnapshotStore::new(),
                provider: RosterProvider { roster },
                clock: SystemClock,
                years,
                pupils,
            }),
        }
    }

    fn queries(&self) -> SnapshotQueries<'_> {
        SnapshotQueries::new(&self.inner.store, &self.inner.provider, &self.inner.clock)
    }
}

/// Response for the display-term endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TermDisplayResponse {
    /// The displayed term identifier, if any term could be selected.
    term_id: Option<i64>,
    /// The displayed term name.
    term_name: Option<String>,
    /// The academic year containing the displayed term.
    year: Option<u16>,
    /// Why this term was selected.
    reason: String,
}

impl From<TermDisplay<'_>> for TermDisplayResponse {
    fn from(display: TermDisplay<'_>) -> Self {
        Self {
            term_id: display.term.map(|term| term.id().value()),
            term_name: display.term.map(|term| term.name().to_string()),
            year: display.year.map(AcademicYear::year),
            reason: display.reason.as_str().to_string(),
        }
    }
}

/// Response for the effective-attributes endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AttributesResponse {
    /// The pupil identifier.
    pupil: i64,
    /// The term identifier.
    term: i64,
    /// The pupil's class group.
    class_group: String,
    /// The pupil's section.
    section: String,
    /// The pupil's fee category.
    fee_category: String,
    /// Whether this is a live view rather than a persisted snapshot.
    live_view: bool,
    /// Whether the persisted snapshot was reconstructed from live data.
    reconstructed: bool,
}

/// One (pupil, term) pair missing a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MissingKeyResponse {
    /// The pupil identifier.
    pupil: i64,
    /// The term identifier.
    term: i64,
}

impl From<SnapshotKey> for MissingKeyResponse {
    fn from(key: SnapshotKey) -> Self {
        Self {
            pupil: key.pupil.value(),
            term: key.term.value(),
        }
    }
}

/// One per-item failure within a bulk operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ItemFailureResponse {
    /// The pupil identifier.
    pupil: i64,
    /// The term identifier.
    term: i64,
    /// The failure detail.
    message: String,
}

impl From<ItemFailure> for ItemFailureResponse {
    fn from(failure: ItemFailure) -> Self {
        Self {
            pupil: failure.pupil.value(),
            term: failure.term.value(),
            message: failure.message,
        }
    }
}

/// Response for the coverage endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CoverageResponse {
    /// Expected snapshot count (pupils x concluded terms).
    expected: usize,
    /// Persisted snapshot count.
    existing: usize,
    /// The missing (pupil, term) pairs.
    missing: Vec<MissingKeyResponse>,
}

impl From<CoverageReport> for CoverageResponse {
    fn from(report: CoverageReport) -> Self {
        Self {
            expected: report.expected,
            existing: report.existing,
            missing: report
                .missing
                .into_iter()
                .map(MissingKeyResponse::from)
                .collect(),
        }
    }
}

/// Response for the stats endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StatsResponse {
    /// Snapshots held for concluded terms.
    concluded: usize,
    /// Snapshots held for the current term.
    current: usize,
    /// Snapshots held for future terms.
    future: usize,
    /// Total persisted snapshots.
    total: usize,
    /// Whether no snapshot exists for a non-concluded term.
    healthy: bool,
}

impl From<SnapshotStats> for StatsResponse {
    fn from(stats: SnapshotStats) -> Self {
        Self {
            concluded: stats.concluded,
            current: stats.current,
            future: stats.future,
            total: stats.total(),
            healthy: stats.is_healthy(),
        }
    }
}

/// Response for the completeness gate endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ValidateResponse {
    /// Expected snapshot count.
    total_expected: usize,
    /// Persisted snapshot count.
    total_existing: usize,
    /// Missing snapshot count.
    missing_count: usize,
    /// Whether the gate passed.
    passed: bool,
}

impl From<CompletenessReport> for ValidateResponse {
    fn from(report: CompletenessReport) -> Self {
        Self {
            total_expected: report.total_expected,
            total_existing: report.total_existing,
            missing_count: report.missing_count,
            passed: report.passed,
        }
    }
}

/// Response for the repair endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RepairResponse {
    /// Snapshots created.
    created: usize,
    /// Items skipped because a concurrent writer satisfied them.
    skipped: usize,
    /// Per-item failures.
    errors: Vec<ItemFailureResponse>,
}

impl From<RepairReport> for RepairResponse {
    fn from(report: RepairReport) -> Self {
        Self {
            created: report.created,
            skipped: report.skipped,
            errors: report
                .errors
                .into_iter()
                .map(ItemFailureResponse::from)
                .collect(),
        }
    }
}

/// Response for the forced-repair endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ForceRepairResponse {
    /// Snapshots created.
    snapshots_created: usize,
    /// Distinct terms touched.
    terms_processed: usize,
    /// Items recovered from live attributes after missing history.
    errors_recovered: usize,
    /// Per-item failures.
    errors: Vec<ItemFailureResponse>,
}

impl From<ForceRepairReport> for ForceRepairResponse {
    fn from(report: ForceRepairReport) -> Self {
        Self {
            snapshots_created: report.snapshots_created,
            terms_processed: report.terms_processed,
            errors_recovered: report.errors_recovered,
            errors: report
                .errors
                .into_iter()
                .map(ItemFailureResponse::from)
                .collect(),
        }
    }
}

/// Response for the cleanup endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CleanupResponse {
    /// Snapshots deleted.
    deleted: usize,
    /// Per-item failures.
    errors: Vec<ItemFailureResponse>,
}

impl From<CleanupReport> for CleanupResponse {
    fn from(report: CleanupReport) -> Self {
        Self {
            deleted: report.deleted,
            errors: report
                .errors
                .into_iter()
                .map(ItemFailureResponse::from)
                .collect(),
        }
    }
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::UnknownTerm(_) | ApiError::UnknownPupil(_) => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            ApiError::ProviderUnavailable { .. } => {
                error!(error = %err, "Attributes provider unavailable");
                Self {
                    status: StatusCode::BAD_GATEWAY,
                    message: err.to_string(),
                }
            }
            ApiError::CalendarInvalid(_) => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: err.to_string(),
            },
            ApiError::StoreFailure(StoreError::Conflict { .. }) => Self {
                status: StatusCode::CONFLICT,
                message: err.to_string(),
            },
            ApiError::StoreFailure(_) => {
                error!(error = %err, "Snapshot store failure");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: err.to_string(),
                }
            }
        }
    }
}

/// Handles `GET /terms/display`.
async fn handle_display_term(
    AxumState(state): AxumState<AppState>,
) -> Result<Json<TermDisplayResponse>, HttpError> {
    let display: TermDisplayResponse = state
        .queries()
        .effective_display_term(&state.inner.years)?
        .into();
    Ok(Json(display))
}

/// Handles `GET /pupils/{pupil}/terms/{term}/attributes`.
async fn handle_effective_attributes(
    AxumState(state): AxumState<AppState>,
    Path((pupil, term)): Path<(i64, i64)>,
) -> Result<Json<AttributesResponse>, HttpError> {
    let pupil: PupilId = PupilId::new(pupil);
    let term: TermId = TermId::new(term);

    let effective: EffectiveAttributes =
        state
            .queries()
            .effective_attributes(&state.inner.years, pupil, term)?;

    Ok(Json(AttributesResponse {
        pupil: pupil.value(),
        term: term.value(),
        class_group: effective.attributes.class_group,
        section: effective.attributes.section,
        fee_category: effective.attributes.fee_category,
        live_view: effective.live_view,
        reconstructed: effective.reconstructed,
    }))
}

/// Handles `GET /admin/coverage`.
async fn handle_coverage(
    AxumState(state): AxumState<AppState>,
) -> Result<Json<CoverageResponse>, HttpError> {
    let report: CoverageReport = state
        .queries()
        .check_coverage(&state.inner.pupils, &state.inner.years)?;
    Ok(Json(report.into()))
}

/// Handles `GET /admin/stats`.
async fn handle_stats(
    AxumState(state): AxumState<AppState>,
) -> Result<Json<StatsResponse>, HttpError> {
    let stats: SnapshotStats = state.queries().stats_by_term_status(&state.inner.years)?;
    Ok(Json(stats.into()))
}

/// Handles `GET /admin/validate`.
async fn handle_validate(
    AxumState(state): AxumState<AppState>,
) -> Result<Json<ValidateResponse>, HttpError> {
    let report: CompletenessReport = state
        .queries()
        .validate_completeness(&state.inner.pupils, &state.inner.years)?;
    Ok(Json(report.into()))
}

/// Handles `POST /admin/repair`.
async fn handle_repair(
    AxumState(state): AxumState<AppState>,
) -> Result<Json<RepairResponse>, HttpError> {
    let report: RepairReport = state.queries().create_all_missing(
        &state.inner.pupils,
        &state.inner.years,
        &CancelToken::new(),
    )?;
    Ok(Json(report.into()))
}

/// Handles `POST /admin/force-repair`.
async fn handle_force_repair(
    AxumState(state): AxumState<AppState>,
) -> Result<Json<ForceRepairResponse>, HttpError> {
    let report: ForceRepairReport = state.queries().force_create_all_missing(
        &state.inner.pupils,
        &state.inner.years,
        &CancelToken::new(),
    )?;
    Ok(Json(report.into()))
}

/// Handles `POST /admin/cleanup`.
async fn handle_cleanup(
    AxumState(state): AxumState<AppState>,
) -> Result<Json<CleanupResponse>, HttpError> {
    let report: CleanupReport = state
        .queries()
        .cleanup_invalid(&state.inner.years, &CancelToken::new())?;
    Ok(Json(report.into()))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/terms/display", get(handle_display_term))
        .route(
            "/pupils/{pupil}/terms/{term}/attributes",
            get(handle_effective_attributes),
        )
        .route("/admin/coverage", get(handle_coverage))
        .route("/admin/stats", get(handle_stats))
        .route("/admin/validate", get(handle_validate))
        .route("/admin/repair", post(handle_repair))
        .route("/admin/force-repair", post(handle_force_repair))
        .route("/admin/cleanup", post(handle_cleanup))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing termsnap server");

    let config: ConfigFile = ConfigFile::load(&args.config)?;
    let years: Vec<AcademicYear> = config.academic_years()?;
    let roster: BTreeMap<PupilId, PupilAttributes> = config.roster();
    info!(
        years = years.len(),
        pupils = roster.len(),
        "Loaded configuration"
    );

    let app: Router = build_router(AppState::new(years, roster));

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
