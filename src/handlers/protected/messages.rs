use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthorizedUser;
use crate::database::models::Message;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendMessage {
    pub recipient_id: Uuid,
    pub body: String,
}

const MESSAGE_COLUMNS: &str = "id, sender_id, recipient_id, body, created_at, read_at";

/// GET /api/messages - messages addressed to the caller, newest first
pub async fn inbox(
    State(state): State<AppState>,
    Extension(user): Extension<AuthorizedUser>,
) -> ApiResult<Vec<Message>> {
    let sql = format!(
        "SELECT {} FROM messages WHERE recipient_id = $1 ORDER BY created_at DESC",
        MESSAGE_COLUMNS
    );
    let messages = sqlx::query_as::<_, Message>(&sql)
        .bind(user.id)
        .fetch_all(state.db.pool())
        .await
        .map_err(DatabaseError::from)?;

    Ok(ApiResponse::success(messages))
}

/// POST /api/messages
pub async fn send(
    State(state): State<AppState>,
    Extension(user): Extension<AuthorizedUser>,
    Json(payload): Json<SendMessage>,
) -> ApiResult<Message> {
    if payload.body.trim().is_empty() {
        return Err(ApiError::field("body", "is required"));
    }
    if payload.recipient_id == user.id {
        return Err(ApiError::field("recipient_id", "cannot message yourself"));
    }

    state
        .guard
        .store()
        .profile_by_user_id(payload.recipient_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Recipient {} not found", payload.recipient_id)))?;

    let sql = format!(
        "INSERT INTO messages (id, sender_id, recipient_id, body) VALUES ($1, $2, $3, $4) RETURNING {}",
        MESSAGE_COLUMNS
    );
    let message = sqlx::query_as::<_, Message>(&sql)
        .bind(Uuid::new_v4())
        .bind(user.id)
        .bind(payload.recipient_id)
        .bind(&payload.body)
        .fetch_one(state.db.pool())
        .await
        .map_err(DatabaseError::from)?;

    Ok(ApiResponse::created(message))
}

/// POST /api/messages/:id/read - only the recipient may mark a message read
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(user): Extension<AuthorizedUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Message> {
    let sql = format!(
        "UPDATE messages SET read_at = COALESCE(read_at, now()) \
         WHERE id = $1 AND recipient_id = $2 RETURNING {}",
        MESSAGE_COLUMNS
    );
    let message = sqlx::query_as::<_, Message>(&sql)
        .bind(id)
        .bind(user.id)
        .fetch_optional(state.db.pool())
        .await
        .map_err(DatabaseError::from)?
        .ok_or_else(|| ApiError::not_found(format!("Message {} not found", id)))?;

    Ok(ApiResponse::success(message))
}
