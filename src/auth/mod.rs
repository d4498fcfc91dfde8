//! Token issuance/verification and role-based authorization.
//!
//! Protected routes call, in order: [`TokenService::verify`],
//! [`AuthorizationGuard::resolve_authority`] and, for role-restricted
//! operations, [`require_role`]. The middleware in `crate::middleware::auth`
//! wires these up for every `/api` route.

use thiserror::Error;
use uuid::Uuid;

use crate::database::DatabaseError;

pub mod guard;
pub mod password;
pub mod signin;
pub mod token;

pub use guard::{
    check_faculty_eligibility, ensure_course_staff, ensure_same_department, require_role, AuthorizationGuard,
    AuthorizedUser,
};
pub use signin::{sign_in, SignIn};
pub use token::{Claims, IssuedToken, TokenError, TokenService};

#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing, malformed or expired credential. No sub-reason is exposed.
    #[error("Authentication required")]
    Unauthenticated,

    #[error("No profile exists for identity {0}")]
    ProfileNotFound(Uuid),

    #[error("{0}")]
    Forbidden(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Faculty account has not been approved yet")]
    FacultyNotApproved,

    #[error("Faculty account has no department assigned")]
    FacultyMissingDepartment,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Store(#[from] DatabaseError),
}
