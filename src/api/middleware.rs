//! API Middleware
//!
//! Session authentication and request logging.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use uuid::Uuid;

use crate::auth::{SessionError, SESSION_COOKIE};
use crate::domain::RequestContext;
use crate::error::AppError;
use crate::state::AppState;

/// Header set by `SetRequestIdLayer` and echoed back to the client
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// The user a verified session token belongs to
#[derive(Debug, Clone)]
pub struct RequestUser {
    pub user_id: String,
}

// =========================================================================
// Session Authentication Middleware
// =========================================================================

/// Verify the session token and attach the user to the request.
///
/// The token is read from `Authorization: Bearer` first, then from the
/// identity provider's session cookie.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let headers = request.headers();

    let verified = match session_token(headers) {
        Some(token) => state.sessions.verify(&token),
        None => Err(SessionError::Missing),
    };

    let claims = match verified {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!(
                method = %request.method(),
                uri = %request.uri(),
                reason = %err,
                "Rejected unauthenticated request"
            );
            return Err(unauthenticated(headers, &state.settings.sign_in_url, err));
        }
    };

    let mut context = RequestContext::new(claims.sub.clone());
    if let Some(correlation_id) = request_id(headers) {
        context = context.with_correlation_id(correlation_id);
    }
    context.ensure_correlation_id();

    request.extensions_mut().insert(RequestUser {
        user_id: claims.sub,
    });
    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

/// Bearer token, falling back to the session cookie
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(Authorization(bearer)) = headers.typed_get::<Authorization<Bearer>>() {
        return Some(bearer.token().to_string());
    }

    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

/// Browsers are sent to the sign-in page, API clients get a 401
fn unauthenticated(headers: &HeaderMap, sign_in_url: &str, err: SessionError) -> Response {
    if wants_html(headers) {
        return Redirect::to(sign_in_url).into_response();
    }
    AppError::Unauthorized(err.to_string()).into_response()
}

fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|accept| accept.contains("text/html"))
        .unwrap_or(false)
}

fn request_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
}

// =========================================================================
// mask_headers_for_logging
// =========================================================================

/// Headers that should be masked in logs
const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "set-cookie"];

/// Mask sensitive headers for logging
pub fn mask_headers_for_logging(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let name_lower = name.as_str().to_lowercase();
            let masked_value = if SENSITIVE_HEADERS.contains(&name_lower.as_str()) {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("[invalid utf8]").to_string()
            };
            (name.to_string(), masked_value)
        })
        .collect()
}

// =========================================================================
// Request Logging Middleware
// =========================================================================

/// Request logging middleware
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let version = request.version();

    let headers = mask_headers_for_logging(request.headers());
    let correlation_id = request_id(request.headers());

    let start = std::time::Instant::now();

    tracing::info!(
        method = %method,
        uri = %uri,
        version = ?version,
        correlation_id = ?correlation_id,
        headers = ?headers,
        "Incoming request"
    );

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %duration.as_millis(),
        correlation_id = ?correlation_id,
        "Request completed"
    );

    response
}
