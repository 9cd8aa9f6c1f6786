//! Session extraction middleware
//!
//! Reads the signed token and institution id from the request cookies,
//! resolves them into a [`Session`] once, and threads it to every handler
//! through request extensions. Handlers never read cookies themselves.
//!
//! **Note:** This is applied to protected routes only. The health endpoint
//! does NOT use this middleware.

use axum::{
    extract::Request,
    http::header::COOKIE,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use stugate_common::session;

use crate::error::ApiError;

/// Cookie carrying the signed token
pub const TOKEN_COOKIE: &str = "token";
/// Cookie carrying the institution id
pub const ENTITY_COOKIE: &str = "institution";

/// Resolve the caller's session and stash it in request extensions
///
/// Returns 401 with a JSON error body when the cookies are absent or the
/// credential fails resolution.
pub async fn session_middleware(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let token = cookie_value(request.headers(), TOKEN_COOKIE)
        .ok_or_else(|| ApiError::Unauthorized("missing token cookie".to_string()))?;
    let entity_id = cookie_value(request.headers(), ENTITY_COOKIE)
        .ok_or_else(|| ApiError::Unauthorized("missing institution cookie".to_string()))?;

    let session = session::resolve(&token, &entity_id)?;

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

/// Extract one cookie value from the Cookie header
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(COOKIE)?.to_str().ok()?;
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

// ========================================
// Tests
// ========================================
