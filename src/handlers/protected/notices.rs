use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{ensure_same_department, AuthorizedUser};
use crate::database::models::Notice;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::types::{NoticeAudience, Role};

#[derive(Debug, Deserialize)]
pub struct CreateNotice {
    pub title: String,
    pub body: String,
    pub audience: Option<String>,
    pub department_id: Option<Uuid>,
}

const NOTICE_COLUMNS: &str = "id, title, body, audience, department_id, author_id, created_at";

/// GET /api/notices
///
/// Students and faculty see notices addressed to their audience, either
/// campus-wide or for their own department. Admin and principal see all.
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthorizedUser>,
) -> ApiResult<Vec<Notice>> {
    let audiences: Vec<&str> = NoticeAudience::visible_to(user.role).to_vec();
    let unscoped = matches!(user.role, Role::Admin | Role::Principal);

    let sql = format!(
        "SELECT {} FROM notices \
         WHERE audience = ANY($1) \
           AND ($2 OR department_id IS NULL OR department_id = $3) \
         ORDER BY created_at DESC",
        NOTICE_COLUMNS
    );
    let notices = sqlx::query_as::<_, Notice>(&sql)
        .bind(&audiences)
        .bind(unscoped)
        .bind(user.department_id)
        .fetch_all(state.db.pool())
        .await
        .map_err(DatabaseError::from)?;

    Ok(ApiResponse::success(notices))
}

/// POST /api/notices (staff)
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthorizedUser>,
    Json(payload): Json<CreateNotice>,
) -> ApiResult<Notice> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(ApiError::field("title", "is required"));
    }
    if payload.body.trim().is_empty() {
        return Err(ApiError::field("body", "is required"));
    }

    let audience = match payload.audience.as_deref() {
        None => NoticeAudience::All,
        Some(raw) => raw
            .parse::<NoticeAudience>()
            .map_err(|e| ApiError::field("audience", e.to_string()))?,
    };

    // Faculty post to their own department; omitting it defaults there
    let department_id = match user.role {
        Role::Faculty => {
            let target = payload.department_id.or(user.department_id);
            if let Some(department_id) = target {
                ensure_same_department(&user, department_id)?;
            }
            target
        }
        _ => payload.department_id,
    };

    let sql = format!(
        "INSERT INTO notices (id, title, body, audience, department_id, author_id) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
        NOTICE_COLUMNS
    );
    let notice = sqlx::query_as::<_, Notice>(&sql)
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(&payload.body)
        .bind(audience.as_str())
        .bind(department_id)
        .bind(user.id)
        .fetch_one(state.db.pool())
        .await
        .map_err(|e| DatabaseError::or_conflict(e, "Notice could not be created"))?;

    tracing::info!("Notice {} posted by {} for '{}'", notice.id, user.id, notice.audience);
    Ok(ApiResponse::created(notice))
}

/// DELETE /api/notices/:id (author or admin)
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthorizedUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let author: Option<(Uuid,)> = sqlx::query_as("SELECT author_id FROM notices WHERE id = $1")
        .bind(id)
        .fetch_optional(state.db.pool())
        .await
        .map_err(DatabaseError::from)?;

    let (author_id,) = author.ok_or_else(|| ApiError::not_found(format!("Notice {} not found", id)))?;
    if author_id != user.id && user.role != Role::Admin {
        return Err(ApiError::forbidden("Only the author or an admin may delete this notice"));
    }

    sqlx::query("DELETE FROM notices WHERE id = $1")
        .bind(id)
        .execute(state.db.pool())
        .await
        .map_err(DatabaseError::from)?;

    Ok(ApiResponse::no_content())
}
