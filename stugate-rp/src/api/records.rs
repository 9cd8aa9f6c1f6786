//! Record endpoints
//!
//! Thin handlers over [`crate::fetch::RecordsService`]: extract the session
//! and the enrollment id, delegate, wrap in JSON. Degraded resources come
//! back as their empty shapes with a 200 - partial data availability is
//! normal and the page decides how to render it.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use std::collections::BTreeMap;
use stugate_common::Session;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    AnnualResult, Enrollment, ExamGrades, GroupAssignment, PeriodResult, SemesterGrades,
    TimetableGrid,
};
use crate::AppState;

/// GET /api/enrollments
pub async fn list_enrollments(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Json<Vec<Enrollment>> {
    Json(state.records.enrollments(&session).await)
}

/// GET /api/enrollments/:id/assessment
pub async fn get_assessment_grades(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(enrollment_id): Path<i64>,
) -> Json<SemesterGrades> {
    Json(state.records.assessment_grades(&session, enrollment_id).await)
}

/// GET /api/enrollments/:id/exams
pub async fn get_exam_grades(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(enrollment_id): Path<i64>,
) -> Json<ExamGrades> {
    Json(state.records.exam_grades(&session, enrollment_id).await)
}

/// GET /api/enrollments/:id/results/periodic
pub async fn get_periodic_results(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(enrollment_id): Path<i64>,
) -> Json<Vec<PeriodResult>> {
    Json(state.records.periodic_results(&session, enrollment_id).await)
}

/// GET /api/enrollments/:id/results/annual
pub async fn get_annual_results(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(enrollment_id): Path<i64>,
) -> Json<Vec<AnnualResult>> {
    Json(state.records.annual_results(&session, enrollment_id).await)
}

/// GET /api/enrollments/:id/group
pub async fn get_group_assignments(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(enrollment_id): Path<i64>,
) -> Json<BTreeMap<String, GroupAssignment>> {
    Json(state.records.group_assignments(&session, enrollment_id).await)
}

/// GET /api/enrollments/:id/timetable
pub async fn get_timetable(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(enrollment_id): Path<i64>,
) -> Json<TimetableGrid> {
    Json(state.records.timetable(&session, enrollment_id).await)
}

/// GET /api/profile/photo
pub async fn get_profile_photo(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Response> {
    match state.records.profile_photo(&session).await {
        Some(media) => Ok(media_response(media.content_type, media.bytes)),
        None => Err(ApiError::NotFound("profile photo unavailable".to_string())),
    }
}

/// GET /api/institution/logo
pub async fn get_institution_logo(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Response> {
    match state.records.institution_logo(&session).await {
        Some(media) => Ok(media_response(media.content_type, media.bytes)),
        None => Err(ApiError::NotFound("institution logo unavailable".to_string())),
    }
}

fn media_response(content_type: String, bytes: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, content_type)], bytes).into_response()
}
