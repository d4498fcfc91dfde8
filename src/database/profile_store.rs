use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Profile, UserCredentials};

/// Read access to the records the authorization guard and sign-in depend on.
///
/// Implementations must not cache: every call reflects the current stored state.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Profile for an identity, `None` if the identity has no profile
    async fn profile_by_user_id(&self, user_id: Uuid) -> Result<Option<Profile>, DatabaseError>;

    /// Identity, password hash and (optional) profile by email, case-insensitive
    async fn credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DatabaseError>;
}

/// Postgres-backed store over the `users` and `profiles` tables
#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn profile_by_user_id(&self, user_id: Uuid) -> Result<Option<Profile>, DatabaseError> {
        let query = r#"
            SELECT p.user_id, u.email, u.name, p.role, p.approval_status, p.department_id
            FROM profiles p
            JOIN users u ON u.id = p.user_id
            WHERE p.user_id = $1
        "#;

        let profile = sqlx::query_as::<_, Profile>(query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(profile)
    }

    async fn credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DatabaseError> {
        let query = r#"
            SELECT u.id, u.id AS user_id, u.email, u.name, u.password_hash,
                   p.role, p.approval_status, p.department_id
            FROM users u
            LEFT JOIN profiles p ON p.user_id = u.id
            WHERE lower(u.email) = lower($1)
        "#;

        let credentials = sqlx::query_as::<_, UserCredentials>(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(credentials)
    }
}
