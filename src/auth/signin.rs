use serde::Serialize;
use uuid::Uuid;

use super::guard::check_faculty_eligibility;
use super::password::verify_password;
use super::token::TokenService;
use super::AuthError;
use crate::database::ProfileStore;
use crate::types::Role;

/// Successful sign-in: identity, email, role and the issued credential
#[derive(Debug, Clone, Serialize)]
pub struct SignIn {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub token: String,
    pub expires_in: i64,
}

/// Authenticate `email`/`password` and issue a credential.
///
/// The faculty gate runs before the password check, so an unapproved or
/// department-less faculty account is refused with its specific reason
/// whatever password was supplied.
pub async fn sign_in(
    store: &dyn ProfileStore,
    tokens: &TokenService,
    email: &str,
    password: &str,
) -> Result<SignIn, AuthError> {
    let credentials = store
        .credentials_by_email(email.trim())
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if let Some(profile) = &credentials.profile {
        check_faculty_eligibility(profile.role, profile.approval_status, profile.department_id)?;
    }

    let matches = verify_password(password, &credentials.password_hash).unwrap_or_else(|e| {
        tracing::error!("Password check failed for user {}: {}", credentials.user_id, e);
        false
    });
    if !matches {
        return Err(AuthError::InvalidCredentials);
    }

    let profile = credentials
        .profile
        .ok_or(AuthError::ProfileNotFound(credentials.user_id))?;

    let issued = tokens.issue(profile.user_id, &profile.email, profile.role)?;
    tracing::info!("User {} signed in as {}", profile.user_id, profile.role);

    Ok(SignIn {
        id: profile.user_id,
        email: profile.email,
        name: profile.name,
        role: profile.role,
        token: issued.token,
        expires_in: issued.expires_in,
    })
}
