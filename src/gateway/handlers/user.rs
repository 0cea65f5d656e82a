//! User registration and login

use std::sync::Arc;

use axum::extract::State;

use super::super::state::AppState;
use super::super::types::{
    ApiError, ApiResult, CreateUserRequest, LoginUserRequest, LoginUserResponse, UserResponse,
    ValidatedJson, created, error_codes, ok,
};
use crate::user::{CreateUserParams, PasswordError, UserRepository, check_password, hash_password};

/// Register a new user
///
/// POST /users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> ApiResult<UserResponse> {
    let hashed_password = hash_password(&req.password).map_err(|e| {
        tracing::error!(error = %e, "Password hashing failed");
        ApiError::internal("failed to hash password")
    })?;

    let params = CreateUserParams {
        username: req.username,
        hashed_password,
        full_name: req.full_name,
        email: req.email,
    };
    let user = UserRepository::create(state.db.pool(), &params).await?;

    tracing::info!(username = %user.username, "User created");
    created(UserResponse::from(user))
}

/// Exchange username and password for an access token
///
/// POST /users/login
pub async fn login_user(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginUserRequest>,
) -> ApiResult<LoginUserResponse> {
    let user = UserRepository::get(state.db.pool(), &req.username)
        .await?
        .ok_or_else(|| ApiError::not_found(error_codes::USER_NOT_FOUND, "user not found"))?;

    match check_password(&req.password, &user.hashed_password) {
        Ok(()) => {}
        Err(PasswordError::Mismatch) => {
            return ApiError::unauthorized("incorrect password").into_err();
        }
        Err(e) => {
            tracing::error!(username = %user.username, error = %e, "Stored password hash unreadable");
            return ApiError::internal("failed to verify password").into_err();
        }
    }

    let (access_token, payload) = state
        .token_maker
        .create_token(&user.username, state.access_token_duration)?;

    ok(LoginUserResponse {
        access_token,
        access_token_expires_at: payload.expired_at,
        user: UserResponse::from(user),
    })
}
