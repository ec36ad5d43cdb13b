use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::response::{ok, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/unread-count", get(unread_count))
        .route("/:id/read", post(mark_read))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    limit: Option<u64>,
    unread_only: Option<bool>,
}

async fn list_notifications(
    user: AuthUser,
    Query(query): Query<ListQuery>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE) as usize;
    let unread_only = query.unread_only.unwrap_or(false);

    let notifications = state
        .store()
        .list_notifications(&user.user_id, limit, unread_only)?;
    Ok(ok(notifications))
}

async fn unread_count(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let count = state.store().count_unread_notifications(&user.user_id)?;
    Ok(ok(serde_json::json!({"unread": count})))
}

async fn mark_read(
    user: AuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let notification = state
        .store()
        .mark_notification_read(&user.user_id, &id)?
        .ok_or_else(|| AppError::not_found("Notification not found"))?;
    Ok(ok(notification))
}
