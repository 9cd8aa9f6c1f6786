//! Shared test support: stub upstream, session and service builders
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use stugate_common::{session, Session, TieredCache};
use stugate_rp::fetch::RecordsService;
use stugate_rp::upstream::{AcademicApi, MediaPayload, UpstreamError};

/// How a failing stub should fail
#[derive(Debug, Clone, Copy)]
pub enum FailMode {
    Timeout,
    Unauthorized,
    Network,
    Server(u16),
}

impl FailMode {
    fn into_error(self) -> UpstreamError {
        match self {
            FailMode::Timeout => UpstreamError::Timeout,
            FailMode::Unauthorized => UpstreamError::Unauthorized,
            FailMode::Network => UpstreamError::Network("connection refused".to_string()),
            FailMode::Server(status) => UpstreamError::Server { status },
        }
    }
}

/// In-memory `AcademicApi` with canned responses and a call counter
#[derive(Default)]
pub struct StubUpstream {
    json_routes: HashMap<String, Value>,
    media_routes: HashMap<String, MediaPayload>,
    fail: Option<FailMode>,
    calls: AtomicUsize,
}

impl StubUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stub that fails every call with the given mode
    pub fn failing(mode: FailMode) -> Self {
        Self {
            fail: Some(mode),
            ..Self::default()
        }
    }

    pub fn json(mut self, path: &str, value: Value) -> Self {
        self.json_routes.insert(path.to_string(), value);
        self
    }

    pub fn media(mut self, path: &str, content_type: &str, bytes: Vec<u8>) -> Self {
        self.media_routes.insert(
            path.to_string(),
            MediaPayload {
                content_type: content_type.to_string(),
                bytes,
            },
        );
        self
    }

    /// Total upstream calls observed (JSON and media combined)
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AcademicApi for StubUpstream {
    async fn get_json(
        &self,
        path: &str,
        _session: &Session,
        _timeout: Duration,
    ) -> Result<Value, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(mode) = self.fail {
            return Err(mode.into_error());
        }
        self.json_routes
            .get(path)
            .cloned()
            .ok_or(UpstreamError::Server { status: 404 })
    }

    async fn get_bytes(
        &self,
        path: &str,
        _session: &Session,
        _timeout: Duration,
    ) -> Result<MediaPayload, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(mode) = self.fail {
            return Err(mode.into_error());
        }
        self.media_routes
            .get(path)
            .cloned()
            .ok_or(UpstreamError::Server { status: 404 })
    }
}

/// Records service over a stub with fast test TTLs
pub fn service_over(stub: Arc<StubUpstream>) -> RecordsService {
    RecordsService::new(
        stub,
        Arc::new(TieredCache::new(Duration::from_secs(60))),
        Arc::new(TieredCache::new(Duration::from_secs(60))),
        Duration::from_secs(1),
        Duration::from_secs(1),
    )
}

/// Session as the middleware would have resolved it for `raw_token`
pub fn test_session(raw_token: &str, subject_id: &str) -> Session {
    Session {
        raw_credential: raw_token.to_string(),
        subject_id: subject_id.to_string(),
        entity_id: "27".to_string(),
        credential_digest: session::credential_digest(raw_token),
    }
}

/// Encode a decodable signed token for middleware-level tests
pub fn encode_token(sub: &str, inst: &str) -> String {
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &serde_json::json!({ "sub": sub, "inst": inst, "exp": 4102444800u64 }),
        &jsonwebtoken::EncodingKey::from_secret(b"test-secret"),
    )
    .expect("Should encode test token")
}

/// A flat two-semester assessment payload with arrival order reversed
/// relative to period ids
pub fn two_semester_notes() -> Value {
    serde_json::json!([
        { "periodLabel": "S1", "periodId": 2, "courseLabel": "Analyse", "note": 12.0 },
        { "periodLabel": "S2", "periodId": 1, "courseLabel": "Analyse", "note": 8.0 },
    ])
}
