use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Profile;
use crate::database::users::{decide_faculty, list_faculty};
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::types::ApprovalStatus;

#[derive(Debug, Deserialize)]
pub struct FacultyQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApproveFaculty {
    pub department_id: Option<Uuid>,
}

/// GET /api/admin/faculty[?status=pending|approved|rejected]
pub async fn list(State(state): State<AppState>, Query(query): Query<FacultyQuery>) -> ApiResult<Vec<Profile>> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<ApprovalStatus>)
        .transpose()
        .map_err(|e| ApiError::field("status", e.to_string()))?;

    Ok(ApiResponse::success(list_faculty(state.db.pool(), status).await?))
}

/// POST /api/admin/faculty/:id/approve - requires the department to assign
pub async fn approve(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<ApproveFaculty>,
) -> ApiResult<Profile> {
    let department_id = payload
        .department_id
        .ok_or_else(|| ApiError::field("department_id", "is required to approve faculty"))?;

    let exists: (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM departments WHERE id = $1)")
        .bind(department_id)
        .fetch_one(state.db.pool())
        .await
        .map_err(DatabaseError::from)?;
    if !exists.0 {
        return Err(ApiError::not_found(format!("Department {} not found", department_id)));
    }

    decide_faculty(state.db.pool(), user_id, ApprovalStatus::Approved, Some(department_id)).await?;
    tracing::info!("Faculty {} approved into department {}", user_id, department_id);

    decided_profile(&state, user_id).await
}

/// POST /api/admin/faculty/:id/reject
pub async fn reject(State(state): State<AppState>, Path(user_id): Path<Uuid>) -> ApiResult<Profile> {
    decide_faculty(state.db.pool(), user_id, ApprovalStatus::Rejected, None).await?;
    tracing::info!("Faculty {} rejected", user_id);

    decided_profile(&state, user_id).await
}

async fn decided_profile(state: &AppState, user_id: Uuid) -> ApiResult<Profile> {
    let profile = state
        .guard
        .store()
        .profile_by_user_id(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Faculty profile {} not found", user_id)))?;
    Ok(ApiResponse::success(profile))
}
