use sqlx::PgPool;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::Profile;
use crate::types::{ApprovalStatus, Role};

/// Fields needed to create an identity together with its profile
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub department_id: Option<Uuid>,
    /// Explicit starting status; `None` uses the role default
    pub status: Option<ApprovalStatus>,
}

impl NewUser {
    /// Faculty start out pending unless created pre-approved; every other
    /// role is usable immediately
    pub fn initial_status(&self) -> ApprovalStatus {
        match (self.role, self.status) {
            (Role::Faculty, Some(status)) => status,
            (Role::Faculty, None) => ApprovalStatus::Pending,
            _ => ApprovalStatus::Approved,
        }
    }
}

/// Insert `users` + `profiles` rows in one transaction
pub async fn insert_user(pool: &PgPool, new_user: NewUser) -> Result<Profile, DatabaseError> {
    let id = Uuid::new_v4();
    let status = new_user.initial_status();
    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO users (id, email, name, password_hash) VALUES ($1, lower($2), $3, $4)")
        .bind(id)
        .bind(&new_user.email)
        .bind(&new_user.name)
        .bind(&new_user.password_hash)
        .execute(&mut *tx)
        .await
        .map_err(|e| DatabaseError::or_conflict(e, format!("Email '{}' is already registered", new_user.email)))?;

    sqlx::query(
        "INSERT INTO profiles (user_id, role, approval_status, department_id) VALUES ($1, $2, $3, $4)",
    )
    .bind(id)
    .bind(new_user.role.as_str())
    .bind(status.as_str())
    .bind(new_user.department_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| DatabaseError::or_conflict(e, "Profile already exists"))?;

    tx.commit().await?;

    Ok(Profile {
        user_id: id,
        email: new_user.email.to_lowercase(),
        name: new_user.name,
        role: new_user.role,
        approval_status: status,
        department_id: new_user.department_id,
    })
}

/// Faculty profiles, optionally filtered by approval status
pub async fn list_faculty(pool: &PgPool, status: Option<ApprovalStatus>) -> Result<Vec<Profile>, DatabaseError> {
    let query = r#"
        SELECT p.user_id, u.email, u.name, p.role, p.approval_status, p.department_id
        FROM profiles p
        JOIN users u ON u.id = p.user_id
        WHERE p.role = 'faculty'
        AND ($1::text IS NULL OR p.approval_status = $1)
        ORDER BY u.created_at
    "#;

    let rows = sqlx::query_as::<_, Profile>(query)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Move a pending faculty profile to `approved` or `rejected`.
/// Only `pending` rows change; anything else reports `Conflict`.
pub async fn decide_faculty(
    pool: &PgPool,
    user_id: Uuid,
    decision: ApprovalStatus,
    department_id: Option<Uuid>,
) -> Result<(), DatabaseError> {
    let result = sqlx::query(
        r#"
        UPDATE profiles
        SET approval_status = $2,
            department_id = COALESCE($3, department_id),
            updated_at = now()
        WHERE user_id = $1 AND role = 'faculty' AND approval_status = 'pending'
        "#,
    )
    .bind(user_id)
    .bind(decision.as_str())
    .bind(department_id)
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::or_conflict(e, "Conflicting profile update"))?;

    if result.rows_affected() == 1 {
        return Ok(());
    }

    let exists: Option<(String,)> =
        sqlx::query_as("SELECT approval_status FROM profiles WHERE user_id = $1 AND role = 'faculty'")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    match exists {
        None => Err(DatabaseError::NotFound(format!("Faculty profile {} not found", user_id))),
        Some((status,)) => Err(DatabaseError::Conflict(format!(
            "Faculty profile {} is already {}",
            user_id, status
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(role: Role) -> NewUser {
        NewUser {
            email: "a@b.edu".to_string(),
            name: "A".to_string(),
            password_hash: "x".to_string(),
            role,
            department_id: None,
            status: None,
        }
    }

    #[test]
    fn faculty_start_pending() {
        assert_eq!(new_user(Role::Faculty).initial_status(), ApprovalStatus::Pending);
        assert_eq!(new_user(Role::Student).initial_status(), ApprovalStatus::Approved);
        assert_eq!(new_user(Role::Admin).initial_status(), ApprovalStatus::Approved);
    }

    #[test]
    fn operator_created_faculty_start_approved() {
        let faculty = NewUser {
            status: Some(ApprovalStatus::Approved),
            ..new_user(Role::Faculty)
        };
        assert_eq!(faculty.initial_status(), ApprovalStatus::Approved);

        // A student cannot be created pending
        let student = NewUser {
            status: Some(ApprovalStatus::Pending),
            ..new_user(Role::Student)
        };
        assert_eq!(student.initial_status(), ApprovalStatus::Approved);
    }
}
