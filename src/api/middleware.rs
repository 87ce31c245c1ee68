//! API Middleware
//!
//! Bearer authentication and request logging.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::domain::Principal;
use crate::error::{AppError, AppResult};
use crate::service::UserService;

use super::AppState;

/// Authenticate the request from its `Authorization: Bearer <token>` header.
///
/// A missing header, a malformed header, an invalid token, and a token whose
/// subject no longer exists all produce the same unauthenticated response;
/// none of them reveals which check failed. On success the resolved
/// [`Principal`] is attached to the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let principal = match resolve_principal(&state, &headers).await {
        Ok(principal) => principal,
        // Infrastructure faults keep their own status; everything
        // auth-shaped collapses into one 401.
        Err(err @ (AppError::Database(_) | AppError::Internal(_))) => {
            return Err(err.into_response())
        }
        Err(_) => return Err(AppError::Unauthenticated.into_response()),
    };

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

async fn resolve_principal(state: &AppState, headers: &HeaderMap) -> AppResult<Principal> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthenticated)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthenticated)?;

    let verified = state
        .tokens
        .validate(token)
        .ok_or(AppError::Unauthenticated)?;

    UserService::new(state.pool.clone())
        .find_by_email(&verified.email)
        .await
}

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

/// Request logging middleware
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let headers = mask_headers_for_logging(request.headers());

    let start = std::time::Instant::now();

    tracing::info!(
        method = %method,
        uri = %uri,
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
        "Request completed"
    );

    response
}
