use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use uuid::Uuid;

use super::utils::load_course;
use crate::auth::{ensure_course_staff, AuthorizedUser};
use crate::database::models::AttendanceRecord;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AttendanceEntry {
    pub student_id: Uuid,
    pub present: bool,
}

#[derive(Debug, Deserialize)]
pub struct RecordAttendance {
    pub date: NaiveDate,
    pub records: Vec<AttendanceEntry>,
}

#[derive(Debug, Deserialize)]
pub struct AttendanceQuery {
    pub course_id: Option<Uuid>,
}

const ATTENDANCE_COLUMNS: &str = "course_id, student_id, date, present, recorded_by";

/// POST /api/courses/:id/attendance (course staff)
///
/// Records one day of attendance. Every listed student must be enrolled;
/// re-recording the same day overwrites the earlier mark.
pub async fn record(
    State(state): State<AppState>,
    Extension(user): Extension<AuthorizedUser>,
    Path(course_id): Path<Uuid>,
    Json(payload): Json<RecordAttendance>,
) -> ApiResult<Vec<AttendanceRecord>> {
    let pool = state.db.pool();
    let course = load_course(pool, course_id).await?;
    ensure_course_staff(&user, &course)?;

    if payload.records.is_empty() {
        return Err(ApiError::field("records", "must not be empty"));
    }

    let student_ids: Vec<Uuid> = payload.records.iter().map(|r| r.student_id).collect();
    let unique: HashSet<Uuid> = student_ids.iter().copied().collect();
    if unique.len() != student_ids.len() {
        return Err(ApiError::field("records", "each student may appear only once"));
    }

    let enrolled: Vec<(Uuid,)> =
        sqlx::query_as("SELECT student_id FROM enrollments WHERE course_id = $1 AND student_id = ANY($2)")
            .bind(course.id)
            .bind(&student_ids)
            .fetch_all(pool)
            .await
            .map_err(DatabaseError::from)?;

    if enrolled.len() != unique.len() {
        let enrolled: HashSet<Uuid> = enrolled.into_iter().map(|(id,)| id).collect();
        let missing = unique
            .difference(&enrolled)
            .map(Uuid::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(ApiError::bad_request(format!(
            "Students not enrolled in {}: {}",
            course.code, missing
        )));
    }

    let sql = format!(
        "INSERT INTO attendance ({cols}) VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (course_id, student_id, date) \
         DO UPDATE SET present = EXCLUDED.present, recorded_by = EXCLUDED.recorded_by \
         RETURNING {cols}",
        cols = ATTENDANCE_COLUMNS
    );

    let mut tx = pool.begin().await.map_err(DatabaseError::from)?;
    let mut saved = Vec::with_capacity(payload.records.len());
    for entry in &payload.records {
        let row = sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(course.id)
            .bind(entry.student_id)
            .bind(payload.date)
            .bind(entry.present)
            .bind(user.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(DatabaseError::from)?;
        saved.push(row);
    }
    tx.commit().await.map_err(DatabaseError::from)?;

    tracing::info!(
        "Recorded attendance for {} students in {} on {}",
        saved.len(),
        course.code,
        payload.date
    );
    Ok(ApiResponse::success(saved))
}

/// GET /api/attendance[?course_id=] (student) - the caller's own records
pub async fn mine(
    State(state): State<AppState>,
    Extension(user): Extension<AuthorizedUser>,
    Query(query): Query<AttendanceQuery>,
) -> ApiResult<Vec<AttendanceRecord>> {
    let sql = format!(
        "SELECT {} FROM attendance WHERE student_id = $1 AND ($2::uuid IS NULL OR course_id = $2) \
         ORDER BY date DESC",
        ATTENDANCE_COLUMNS
    );
    let records = sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(user.id)
        .bind(query.course_id)
        .fetch_all(state.db.pool())
        .await
        .map_err(DatabaseError::from)?;

    Ok(ApiResponse::success(records))
}
