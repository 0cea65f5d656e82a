//! Bearer-token authentication
//!
//! Verifies `Authorization: Bearer <token>` and injects the token
//! [`Payload`](crate::token::Payload) into request extensions.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::state::AppState;
use super::types::{ApiError, error_codes};

pub const AUTHORIZATION_TYPE_BEARER: &str = "bearer";

/// Extract the token from an `Authorization` header value
pub fn parse_bearer(auth_header: &str) -> Result<&str, ApiError> {
    let mut fields = auth_header.split_whitespace();
    let (Some(auth_type), Some(token), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(ApiError::unauthorized("invalid authorization header format"));
    };

    if !auth_type.eq_ignore_ascii_case(AUTHORIZATION_TYPE_BEARER) {
        return Err(ApiError::unauthorized(format!(
            "unsupported authorization type {}",
            auth_type
        )));
    }

    Ok(token)
}

pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    // 1. Extract Authorization header
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            ApiError::new(
                StatusCode::UNAUTHORIZED,
                error_codes::MISSING_AUTH,
                "authorization header is not provided",
            )
        })?;

    // 2. Verify token
    let token = parse_bearer(auth_header)?;
    let payload = state.token_maker.verify_token(token)?;

    // 3. Inject payload for handlers
    request.extensions_mut().insert(payload);
    Ok(next.run(request).await)
}
