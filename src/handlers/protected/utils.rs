use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Assignment, Course};
use crate::database::DatabaseError;

pub const COURSE_COLUMNS: &str = "id, code, title, department_id, faculty_id, created_at";

pub async fn load_course(pool: &PgPool, course_id: Uuid) -> Result<Course, DatabaseError> {
    sqlx::query_as::<_, Course>(&format!("SELECT {} FROM courses WHERE id = $1", COURSE_COLUMNS))
        .bind(course_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("Course {} not found", course_id)))
}

pub async fn load_assignment(pool: &PgPool, assignment_id: Uuid) -> Result<Assignment, DatabaseError> {
    sqlx::query_as::<_, Assignment>(
        "SELECT id, course_id, title, description, due_at, created_by, created_at FROM assignments WHERE id = $1",
    )
    .bind(assignment_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound(format!("Assignment {} not found", assignment_id)))
}

pub async fn is_enrolled(pool: &PgPool, course_id: Uuid, student_id: Uuid) -> Result<bool, DatabaseError> {
    let row: (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM enrollments WHERE course_id = $1 AND student_id = $2)",
    )
    .bind(course_id)
    .bind(student_id)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}
