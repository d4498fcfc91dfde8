use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{require_role, AuthError, AuthorizedUser};
use crate::error::ApiError;
use crate::state::AppState;
use crate::types::Role;

/// Authenticates every protected request: bearer token → verify → resolve the
/// current profile. The resolved `AuthorizedUser` is inserted into request
/// extensions for handlers and the role gate.
pub async fn require_auth(State(state): State<AppState>, mut request: Request, next: Next) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers()).map_err(|reason| {
        tracing::debug!("Rejected request to {}: {}", request.uri().path(), reason);
        ApiError::from(AuthError::Unauthenticated)
    })?;

    let claims = state.tokens.verify(token).map_err(AuthError::from)?;

    let user = state.guard.authorize(claims.sub).await.map_err(|e| {
        tracing::warn!("Authorization failed for {}: {}", claims.sub, e);
        e
    })?;

    if user.role != claims.role {
        tracing::debug!(
            "Token for {} was issued as {}, profile now {}",
            user.id,
            claims.role,
            user.role
        );
    }

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Role gate. Mount with `from_fn_with_state(roles::ADMIN, require_roles)`
/// inside a router already protected by `require_auth`.
pub async fn require_roles(
    State(allowed): State<&'static [Role]>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthorizedUser>()
        .ok_or_else(|| ApiError::from(AuthError::Unauthenticated))?;

    require_role(user, allowed).map_err(|e| {
        tracing::warn!("User {} ({}) denied: {}", user.id, user.role, request.uri().path());
        e
    })?;

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header.to_str().map_err(|_| "Invalid Authorization header format")?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or("Authorization header must use Bearer token format")?
        .trim();

    if token.is_empty() {
        return Err("Empty bearer token");
    }
    Ok(token)
}
