use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use uuid::Uuid;

use crate::types::{ApprovalStatus, Role};

/// Authoritative, permission-relevant state for an identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub approval_status: ApprovalStatus,
    pub department_id: Option<Uuid>,
}

/// Identity plus stored password hash, loaded for sign-in only.
/// `profile` is `None` when the identity has no profile row.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub profile: Option<Profile>,
}

fn decode_column<T: std::str::FromStr>(row: &PgRow, column: &str) -> Result<T, sqlx::Error>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for Profile {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            user_id: row.try_get("user_id")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            role: decode_column(row, "role")?,
            approval_status: decode_column(row, "approval_status")?,
            department_id: row.try_get("department_id")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for UserCredentials {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        // LEFT JOIN: profile columns are NULL for an orphaned identity
        let role: Option<String> = row.try_get("role")?;
        let profile = match role {
            Some(_) => Some(Profile::from_row(row)?),
            None => None,
        };

        Ok(Self {
            user_id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            profile,
        })
    }
}
