use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::utils::{load_course, COURSE_COLUMNS};
use crate::auth::{ensure_course_staff, AuthorizedUser};
use crate::database::models::Course;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::types::{ApprovalStatus, Role};

#[derive(Debug, Deserialize)]
pub struct CourseQuery {
    pub department_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCourse {
    pub code: String,
    pub title: String,
    pub department_id: Uuid,
    pub faculty_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct AssignFaculty {
    pub faculty_id: Uuid,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CourseStudent {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}

/// GET /api/courses[?department_id=]
pub async fn list(State(state): State<AppState>, Query(query): Query<CourseQuery>) -> ApiResult<Vec<Course>> {
    let sql = format!(
        "SELECT {} FROM courses WHERE ($1::uuid IS NULL OR department_id = $1) ORDER BY code",
        COURSE_COLUMNS
    );
    let courses = sqlx::query_as::<_, Course>(&sql)
        .bind(query.department_id)
        .fetch_all(state.db.pool())
        .await
        .map_err(DatabaseError::from)?;

    Ok(ApiResponse::success(courses))
}

/// GET /api/courses/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Course> {
    Ok(ApiResponse::success(load_course(state.db.pool(), id).await?))
}

/// POST /api/admin/courses (admin)
pub async fn create(State(state): State<AppState>, Json(payload): Json<CreateCourse>) -> ApiResult<Course> {
    let code = payload.code.trim().to_uppercase();
    let title = payload.title.trim();
    if code.is_empty() {
        return Err(ApiError::field("code", "is required"));
    }
    if title.is_empty() {
        return Err(ApiError::field("title", "is required"));
    }
    if let Some(faculty_id) = payload.faculty_id {
        ensure_teaching_faculty(&state, faculty_id, payload.department_id).await?;
    }

    let sql = format!(
        "INSERT INTO courses (id, code, title, department_id, faculty_id) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
        COURSE_COLUMNS
    );
    let course = sqlx::query_as::<_, Course>(&sql)
        .bind(Uuid::new_v4())
        .bind(&code)
        .bind(title)
        .bind(payload.department_id)
        .bind(payload.faculty_id)
        .fetch_one(state.db.pool())
        .await
        .map_err(|e| DatabaseError::or_conflict(e, format!("Course code '{}' already exists", code)))?;

    tracing::info!("Created course {} ({})", course.code, course.id);
    Ok(ApiResponse::created(course))
}

/// PUT /api/admin/courses/:id/faculty (admin)
pub async fn assign_faculty(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignFaculty>,
) -> ApiResult<Course> {
    let course = load_course(state.db.pool(), id).await?;
    ensure_teaching_faculty(&state, payload.faculty_id, course.department_id).await?;

    let sql = format!("UPDATE courses SET faculty_id = $2 WHERE id = $1 RETURNING {}", COURSE_COLUMNS);
    let course = sqlx::query_as::<_, Course>(&sql)
        .bind(id)
        .bind(payload.faculty_id)
        .fetch_one(state.db.pool())
        .await
        .map_err(DatabaseError::from)?;

    Ok(ApiResponse::success(course))
}

/// GET /api/courses/:id/students (course staff)
pub async fn students(
    State(state): State<AppState>,
    Extension(user): Extension<AuthorizedUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<CourseStudent>> {
    let course = load_course(state.db.pool(), id).await?;
    ensure_course_staff(&user, &course)?;

    let students = sqlx::query_as::<_, CourseStudent>(
        r#"
        SELECT u.id, u.name, u.email, e.enrolled_at
        FROM enrollments e
        JOIN users u ON u.id = e.student_id
        WHERE e.course_id = $1
        ORDER BY u.name
        "#,
    )
    .bind(id)
    .fetch_all(state.db.pool())
    .await
    .map_err(DatabaseError::from)?;

    Ok(ApiResponse::success(students))
}

/// A course may only be taught by approved faculty of its own department
async fn ensure_teaching_faculty(state: &AppState, faculty_id: Uuid, department_id: Uuid) -> Result<(), ApiError> {
    let profile = state
        .guard
        .store()
        .profile_by_user_id(faculty_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User {} not found", faculty_id)))?;

    if profile.role != Role::Faculty || profile.approval_status != ApprovalStatus::Approved {
        return Err(ApiError::field("faculty_id", "must reference an approved faculty member"));
    }
    if profile.department_id != Some(department_id) {
        return Err(ApiError::field("faculty_id", "faculty member belongs to a different department"));
    }
    Ok(())
}
