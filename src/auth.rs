use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::{
    error::ApiError,
    routes::AppState,
    utils::{bearer_token, tokens_match},
};

/// Rejects requests lacking the configured bearer token. With no token
/// configured every request passes through untouched.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.config.auth_token.as_deref() else {
        return Ok(next.run(request).await);
    };

    let presented = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token);
    let had_token = presented.is_some();
    let authorized = presented.is_some_and(|token| tokens_match(token, expected));

    if authorized {
        return Ok(next.run(request).await);
    }

    if had_token {
        tracing::warn!(path = %request.uri().path(), "Rejected request with wrong bearer token");
    } else {
        tracing::warn!(path = %request.uri().path(), "Rejected request without bearer token");
    }
    Err(ApiError::Unauthorized)
}
