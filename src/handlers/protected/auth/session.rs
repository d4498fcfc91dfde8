use axum::{extract::State, Extension};

use crate::auth::{check_faculty_eligibility, AuthError, AuthorizedUser, SignIn};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/auth/me - Current authority, as resolved from the stored profile
pub async fn me(Extension(user): Extension<AuthorizedUser>) -> ApiResult<AuthorizedUser> {
    Ok(ApiResponse::success(user))
}

/// POST /api/auth/refresh - Issue a fresh credential
///
/// The new token carries the role from the current profile, not the one in
/// the presented token. Faculty must pass the same eligibility check as at
/// sign-in, even when the per-request gate is disabled.
pub async fn refresh(
    State(state): State<AppState>,
    Extension(user): Extension<AuthorizedUser>,
) -> ApiResult<SignIn> {
    check_faculty_eligibility(user.role, user.approval_status, user.department_id)?;

    let issued = state
        .tokens
        .issue(user.id, &user.email, user.role)
        .map_err(AuthError::from)?;

    tracing::debug!("Refreshed credential for {}", user.id);

    Ok(ApiResponse::success(SignIn {
        id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
        token: issued.token,
        expires_in: issued.expires_in,
    }))
}
