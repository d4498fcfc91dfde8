use axum::{
    extract::{Path, State},
    Extension,
};
use uuid::Uuid;

use super::utils::load_course;
use crate::auth::AuthorizedUser;
use crate::database::models::{Course, Enrollment};
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /api/courses/:id/enroll (student)
pub async fn enroll(
    State(state): State<AppState>,
    Extension(user): Extension<AuthorizedUser>,
    Path(course_id): Path<Uuid>,
) -> ApiResult<Enrollment> {
    let course = load_course(state.db.pool(), course_id).await?;

    let enrollment = sqlx::query_as::<_, Enrollment>(
        "INSERT INTO enrollments (course_id, student_id) VALUES ($1, $2) RETURNING course_id, student_id, enrolled_at",
    )
    .bind(course.id)
    .bind(user.id)
    .fetch_one(state.db.pool())
    .await
    .map_err(|e| DatabaseError::or_conflict(e, format!("Already enrolled in {}", course.code)))?;

    tracing::info!("Student {} enrolled in {}", user.id, course.code);
    Ok(ApiResponse::created(enrollment))
}

/// DELETE /api/courses/:id/enroll (student)
pub async fn unenroll(
    State(state): State<AppState>,
    Extension(user): Extension<AuthorizedUser>,
    Path(course_id): Path<Uuid>,
) -> ApiResult<()> {
    let result = sqlx::query("DELETE FROM enrollments WHERE course_id = $1 AND student_id = $2")
        .bind(course_id)
        .bind(user.id)
        .execute(state.db.pool())
        .await
        .map_err(DatabaseError::from)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found(format!("Not enrolled in course {}", course_id)));
    }
    Ok(ApiResponse::no_content())
}

/// GET /api/enrollments (student) - courses the caller is enrolled in
pub async fn mine(
    State(state): State<AppState>,
    Extension(user): Extension<AuthorizedUser>,
) -> ApiResult<Vec<Course>> {
    let courses = sqlx::query_as::<_, Course>(
        r#"
        SELECT c.id, c.code, c.title, c.department_id, c.faculty_id, c.created_at
        FROM courses c
        JOIN enrollments e ON e.course_id = c.id
        WHERE e.student_id = $1
        ORDER BY c.code
        "#,
    )
        .bind(user.id)
        .fetch_all(state.db.pool())
        .await
        .map_err(DatabaseError::from)?;

    Ok(ApiResponse::success(courses))
}
