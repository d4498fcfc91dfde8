use axum::{extract::State, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Department;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateDepartment {
    pub name: String,
}

/// GET /api/departments
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Department>> {
    let departments = sqlx::query_as::<_, Department>("SELECT id, name, created_at FROM departments ORDER BY name")
        .fetch_all(state.db.pool())
        .await
        .map_err(DatabaseError::from)?;

    Ok(ApiResponse::success(departments))
}

/// POST /api/admin/departments (admin)
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateDepartment>,
) -> ApiResult<Department> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::field("name", "is required"));
    }

    let department = sqlx::query_as::<_, Department>(
        "INSERT INTO departments (id, name) VALUES ($1, $2) RETURNING id, name, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .fetch_one(state.db.pool())
    .await
    .map_err(|e| DatabaseError::or_conflict(e, format!("Department '{}' already exists", name)))?;

    tracing::info!("Created department {} ({})", department.name, department.id);
    Ok(ApiResponse::created(department))
}
