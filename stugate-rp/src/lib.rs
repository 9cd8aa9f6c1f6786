//! stugate-rp library - Records Proxy module
//!
//! Server-side aggregation layer in front of the slow, rate-limited upstream
//! academic-records service: resolves the caller's session once per request,
//! fetches each resource independently, normalizes the upstream's
//! idiosyncratic payloads into stable shapes, and caches results per user in
//! two TTL tiers.

use axum::{middleware, routing::get, Router};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod normalize;
pub mod upstream;

pub use error::{ApiError, ApiResult};

use crate::fetch::RecordsService;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Fetch orchestration over the upstream client and cache tiers
    pub records: Arc<RecordsService>,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(records: Arc<RecordsService>) -> Self {
        Self {
            records,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// Record endpoints require a resolvable session; the health endpoint does
/// not.
pub fn build_router(state: AppState) -> Router {
    // Protected routes (require a session)
    let protected = Router::new()
        .route("/api/enrollments", get(api::records::list_enrollments))
        .route(
            "/api/enrollments/:id/assessment",
            get(api::records::get_assessment_grades),
        )
        .route(
            "/api/enrollments/:id/exams",
            get(api::records::get_exam_grades),
        )
        .route(
            "/api/enrollments/:id/results/periodic",
            get(api::records::get_periodic_results),
        )
        .route(
            "/api/enrollments/:id/results/annual",
            get(api::records::get_annual_results),
        )
        .route(
            "/api/enrollments/:id/group",
            get(api::records::get_group_assignments),
        )
        .route(
            "/api/enrollments/:id/timetable",
            get(api::records::get_timetable),
        )
        .route("/api/profile/photo", get(api::records::get_profile_photo))
        .route(
            "/api/institution/logo",
            get(api::records::get_institution_logo),
        )
        .layer(middleware::from_fn(api::session_middleware));

    // Public routes (no session)
    let public = api::health_routes();

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
