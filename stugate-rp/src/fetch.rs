//! Per-resource fetch orchestration
//!
//! Every fetcher follows the same path: build a cache key from the resource
//! name, the enrollment id, and the session's credential digest; return the
//! cached normalized value on a hit; otherwise call upstream, normalize,
//! populate the cache, and return. The cache is only ever populated after
//! successful normalization, so it can never hold malformed data.
//!
//! Upstream and normalization failures are absorbed here: the fetcher logs
//! the condition and returns the resource's empty/default shape so one
//! failing resource never blocks the rest of a page. Failed fetches are not
//! cached and are retried on the next request.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use stugate_common::{Session, TieredCache};
use tracing::{debug, warn};

use crate::models::{
    AnnualResult, Enrollment, ExamGrades, GroupAssignment, PeriodResult, SemesterGrades,
    TimetableGrid,
};
use crate::normalize::{exams, groups, semesters, timetable, NormalizeError};
use crate::upstream::{AcademicApi, MediaPayload, UpstreamError};

/// Aggregation service for one upstream academic-records deployment
///
/// Holds the upstream client and both cache tiers by explicit injection -
/// no global state, so tests can build isolated instances.
pub struct RecordsService {
    upstream: Arc<dyn AcademicApi>,
    short_cache: Arc<TieredCache<Value>>,
    long_cache: Arc<TieredCache<MediaPayload>>,
    data_timeout: Duration,
    discovery_timeout: Duration,
}

impl RecordsService {
    pub fn new(
        upstream: Arc<dyn AcademicApi>,
        short_cache: Arc<TieredCache<Value>>,
        long_cache: Arc<TieredCache<MediaPayload>>,
        data_timeout: Duration,
        discovery_timeout: Duration,
    ) -> Self {
        Self {
            upstream,
            short_cache,
            long_cache,
            data_timeout,
            discovery_timeout,
        }
    }

    /// Enrollment years for the session's subject
    ///
    /// Discovery call: the upstream resolves this against its registry and
    /// is noticeably slower than the data endpoints, hence the longer
    /// timeout.
    pub async fn enrollments(&self, session: &Session) -> Vec<Enrollment> {
        self.fetch_normalized(
            session,
            cache_key("enrollments", None, session),
            format!("students/{}/enrollments", session.subject_id),
            self.discovery_timeout,
            |raw| Ok(serde_json::from_value(raw)?),
        )
        .await
    }

    /// Continuous-assessment notes, split into semester buckets
    pub async fn assessment_grades(
        &self,
        session: &Session,
        enrollment_id: i64,
    ) -> SemesterGrades {
        self.fetch_normalized(
            session,
            cache_key("assessment", Some(enrollment_id), session),
            format!("enrollments/{}/assessment-notes", enrollment_id),
            self.data_timeout,
            |raw| semesters::split_semesters(serde_json::from_value(raw)?),
        )
        .await
    }

    /// Exam notes, split by semester then by session marker
    pub async fn exam_grades(&self, session: &Session, enrollment_id: i64) -> ExamGrades {
        self.fetch_normalized(
            session,
            cache_key("exams", Some(enrollment_id), session),
            format!("enrollments/{}/exam-notes", enrollment_id),
            self.data_timeout,
            |raw| exams::split_exams(serde_json::from_value(raw)?),
        )
        .await
    }

    /// Periodic (semester) result summaries, passed through
    pub async fn periodic_results(
        &self,
        session: &Session,
        enrollment_id: i64,
    ) -> Vec<PeriodResult> {
        self.fetch_normalized(
            session,
            cache_key("period-results", Some(enrollment_id), session),
            format!("enrollments/{}/period-results", enrollment_id),
            self.data_timeout,
            |raw| Ok(serde_json::from_value(raw)?),
        )
        .await
    }

    /// Annual result summaries, passed through
    pub async fn annual_results(
        &self,
        session: &Session,
        enrollment_id: i64,
    ) -> Vec<AnnualResult> {
        self.fetch_normalized(
            session,
            cache_key("annual-results", Some(enrollment_id), session),
            format!("enrollments/{}/annual-results", enrollment_id),
            self.data_timeout,
            |raw| Ok(serde_json::from_value(raw)?),
        )
        .await
    }

    /// Group/section assignment per period label
    pub async fn group_assignments(
        &self,
        session: &Session,
        enrollment_id: i64,
    ) -> BTreeMap<String, GroupAssignment> {
        self.fetch_normalized(
            session,
            cache_key("group", Some(enrollment_id), session),
            format!("enrollments/{}/group", enrollment_id),
            self.data_timeout,
            |raw| groups::resolve_groups(serde_json::from_value(raw)?),
        )
        .await
    }

    /// Weekly timetable grid
    pub async fn timetable(&self, session: &Session, enrollment_id: i64) -> TimetableGrid {
        self.fetch_normalized(
            session,
            cache_key("timetable", Some(enrollment_id), session),
            format!("enrollments/{}/timetable", enrollment_id),
            self.data_timeout,
            |raw| timetable::build_grid(serde_json::from_value(raw)?),
        )
        .await
    }

    /// Profile photo for the session's subject (long tier)
    pub async fn profile_photo(&self, session: &Session) -> Option<MediaPayload> {
        self.fetch_media(
            cache_key("photo", None, session),
            format!("students/{}/photo", session.subject_id),
            session,
        )
        .await
    }

    /// Institution logo (long tier)
    pub async fn institution_logo(&self, session: &Session) -> Option<MediaPayload> {
        let key = format!(
            "logo-{}-{}",
            session.entity_id, session.credential_digest
        );
        self.fetch_media(
            key,
            format!("institutions/{}/logo", session.entity_id),
            session,
        )
        .await
    }

    /// Shared miss-then-fetch path for JSON resources (short tier)
    async fn fetch_normalized<T, F>(
        &self,
        session: &Session,
        key: String,
        path: String,
        timeout: Duration,
        normalize: F,
    ) -> T
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnOnce(Value) -> Result<T, NormalizeError>,
    {
        if let Some(hit) = self.short_cache.get(&key) {
            if let Ok(value) = serde_json::from_value(hit) {
                debug!(key = %key, "cache hit");
                return value;
            }
        }

        let raw = match self.upstream.get_json(&path, session, timeout).await {
            Ok(raw) => raw,
            Err(e) => {
                log_degraded(&key, &e);
                return T::default();
            }
        };

        let normalized = match normalize(raw) {
            Ok(normalized) => normalized,
            Err(e) => {
                warn!(key = %key, error = %e, "normalization failed, returning empty result");
                return T::default();
            }
        };

        match serde_json::to_value(&normalized) {
            Ok(value) => self.short_cache.set(&key, value),
            Err(e) => warn!(key = %key, error = %e, "normalized value not cacheable"),
        }

        normalized
    }

    /// Shared miss-then-fetch path for binary resources (long tier)
    async fn fetch_media(
        &self,
        key: String,
        path: String,
        session: &Session,
    ) -> Option<MediaPayload> {
        if let Some(hit) = self.long_cache.get(&key) {
            debug!(key = %key, "cache hit");
            return Some(hit);
        }

        match self.upstream.get_bytes(&path, session, self.data_timeout).await {
            Ok(media) => {
                self.long_cache.set(&key, media.clone());
                Some(media)
            }
            Err(e) => {
                log_degraded(&key, &e);
                None
            }
        }
    }
}

/// `{resource}-{enrollment_id}-{digest}`, or `{resource}-{digest}` for
/// resources not parameterized by an enrollment
fn cache_key(resource: &str, enrollment_id: Option<i64>, session: &Session) -> String {
    match enrollment_id {
        Some(id) => format!("{}-{}-{}", resource, id, session.credential_digest),
        None => format!("{}-{}", resource, session.credential_digest),
    }
}

fn log_degraded(key: &str, error: &UpstreamError) {
    warn!(key = %key, error = %error, "upstream call failed, returning empty result");
}

// ========================================
// Tests
// ========================================
