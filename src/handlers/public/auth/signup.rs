use axum::{extract::State, Json};
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

use super::utils::{validate_display_name, validate_email_format, validate_password_strength};
use crate::auth::password::hash_password;
use crate::database::models::Profile;
use crate::database::users::{insert_user, NewUser};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::types::Role;

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub department_id: Option<Uuid>,
}

/// POST /auth/signup - Register a student or faculty account
///
/// Faculty accounts start `pending` and cannot sign in until an admin
/// approves them and assigns a department. Admin and principal accounts are
/// only created through the `campus create-user` command.
pub async fn signup(State(state): State<AppState>, Json(payload): Json<SignUpRequest>) -> ApiResult<Profile> {
    let mut field_errors = HashMap::new();
    if let Err(e) = validate_display_name(&payload.name) {
        field_errors.insert("name".to_string(), e);
    }
    if let Err(e) = validate_email_format(payload.email.trim()) {
        field_errors.insert("email".to_string(), e);
    }
    if let Err(e) = validate_password_strength(&payload.password) {
        field_errors.insert("password".to_string(), e);
    }
    if !matches!(payload.role, Role::Student | Role::Faculty) {
        field_errors.insert("role".to_string(), "Only student or faculty accounts can self-register".to_string());
    }
    if !field_errors.is_empty() {
        return Err(ApiError::validation_error("Invalid sign-up request", Some(field_errors)));
    }

    let new_user = NewUser {
        email: payload.email.trim().to_string(),
        name: payload.name.trim().to_string(),
        password_hash: hash_password(&payload.password)?,
        role: payload.role,
        department_id: payload.department_id,
        status: None,
    };

    let profile = insert_user(state.db.pool(), new_user).await?;
    tracing::info!(
        "Registered {} {} ({})",
        profile.role,
        profile.user_id,
        profile.approval_status
    );

    Ok(ApiResponse::created(profile))
}
