use axum::{extract::State, Json};
use serde::Deserialize;

use crate::auth::{sign_in, SignIn};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/signin - Authenticate and receive a JWT
///
/// Input: `{ "email": "string", "password": "string" }`
///
/// Success: `{ "success": true, "data": { "id", "email", "name", "role", "token", "expires_in" } }`
///
/// Failures are reported with distinct codes: `INVALID_CREDENTIALS` (401),
/// `FACULTY_NOT_APPROVED` (403), `FACULTY_MISSING_DEPARTMENT` (403).
pub async fn signin(State(state): State<AppState>, Json(payload): Json<SignInRequest>) -> ApiResult<SignIn> {
    if payload.email.trim().is_empty() {
        return Err(ApiError::field("email", "is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::field("password", "is required"));
    }

    let signed = sign_in(
        state.guard.store().as_ref(),
        &state.tokens,
        &payload.email,
        &payload.password,
    )
    .await
    .map_err(|e| {
        tracing::warn!("Sign-in refused for '{}': {}", payload.email.trim(), e);
        e
    })?;

    Ok(ApiResponse::success(signed))
}
