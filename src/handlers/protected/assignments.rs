use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::utils::{is_enrolled, load_assignment, load_course};
use crate::auth::{ensure_course_staff, AuthorizedUser};
use crate::database::models::{Assignment, Submission};
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::types::Role;

#[derive(Debug, Deserialize)]
pub struct CreateAssignment {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAssignment {
    pub content: String,
}

const ASSIGNMENT_COLUMNS: &str = "id, course_id, title, description, due_at, created_by, created_at";

/// GET /api/courses/:id/assignments - enrolled students and course staff
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthorizedUser>,
    Path(course_id): Path<Uuid>,
) -> ApiResult<Vec<Assignment>> {
    let pool = state.db.pool();
    let course = load_course(pool, course_id).await?;

    match user.role {
        Role::Student => {
            if !is_enrolled(pool, course.id, user.id).await? {
                return Err(ApiError::forbidden(format!("Not enrolled in {}", course.code)));
            }
        }
        _ => ensure_course_staff(&user, &course)?,
    }

    let sql = format!(
        "SELECT {} FROM assignments WHERE course_id = $1 ORDER BY due_at NULLS LAST, created_at",
        ASSIGNMENT_COLUMNS
    );
    let assignments = sqlx::query_as::<_, Assignment>(&sql)
        .bind(course.id)
        .fetch_all(pool)
        .await
        .map_err(DatabaseError::from)?;

    Ok(ApiResponse::success(assignments))
}

/// POST /api/courses/:id/assignments (course staff)
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthorizedUser>,
    Path(course_id): Path<Uuid>,
    Json(payload): Json<CreateAssignment>,
) -> ApiResult<Assignment> {
    let pool = state.db.pool();
    let course = load_course(pool, course_id).await?;
    ensure_course_staff(&user, &course)?;

    let title = payload.title.trim();
    if title.is_empty() {
        return Err(ApiError::field("title", "is required"));
    }
    if matches!(payload.due_at, Some(due) if due < Utc::now()) {
        return Err(ApiError::field("due_at", "must be in the future"));
    }

    let sql = format!(
        "INSERT INTO assignments (id, course_id, title, description, due_at, created_by) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
        ASSIGNMENT_COLUMNS
    );
    let assignment = sqlx::query_as::<_, Assignment>(&sql)
        .bind(Uuid::new_v4())
        .bind(course.id)
        .bind(title)
        .bind(&payload.description)
        .bind(payload.due_at)
        .bind(user.id)
        .fetch_one(pool)
        .await
        .map_err(DatabaseError::from)?;

    tracing::info!("Assignment {} created in {} by {}", assignment.id, course.code, user.id);
    Ok(ApiResponse::created(assignment))
}

/// POST /api/assignments/:id/submissions (student) - resubmitting replaces content
pub async fn submit(
    State(state): State<AppState>,
    Extension(user): Extension<AuthorizedUser>,
    Path(assignment_id): Path<Uuid>,
    Json(payload): Json<SubmitAssignment>,
) -> ApiResult<Submission> {
    let pool = state.db.pool();
    let assignment = load_assignment(pool, assignment_id).await?;

    if !is_enrolled(pool, assignment.course_id, user.id).await? {
        return Err(ApiError::forbidden("Not enrolled in this assignment's course"));
    }
    if payload.content.trim().is_empty() {
        return Err(ApiError::field("content", "is required"));
    }

    let submission = sqlx::query_as::<_, Submission>(
        r#"
        INSERT INTO submissions (assignment_id, student_id, content)
        VALUES ($1, $2, $3)
        ON CONFLICT (assignment_id, student_id)
        DO UPDATE SET content = EXCLUDED.content, submitted_at = now()
        RETURNING assignment_id, student_id, content, submitted_at
        "#,
    )
    .bind(assignment.id)
    .bind(user.id)
    .bind(&payload.content)
    .fetch_one(pool)
    .await
    .map_err(DatabaseError::from)?;

    Ok(ApiResponse::created(submission))
}

/// GET /api/assignments/:id/submissions (course staff)
pub async fn submissions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthorizedUser>,
    Path(assignment_id): Path<Uuid>,
) -> ApiResult<Vec<Submission>> {
    let pool = state.db.pool();
    let assignment = load_assignment(pool, assignment_id).await?;
    let course = load_course(pool, assignment.course_id).await?;
    ensure_course_staff(&user, &course)?;

    let submissions = sqlx::query_as::<_, Submission>(
        "SELECT assignment_id, student_id, content, submitted_at FROM submissions \
         WHERE assignment_id = $1 ORDER BY submitted_at",
    )
    .bind(assignment.id)
    .fetch_all(pool)
    .await
    .map_err(DatabaseError::from)?;

    Ok(ApiResponse::success(submissions))
}
