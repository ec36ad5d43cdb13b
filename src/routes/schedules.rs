use axum::extract::State;
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::constants::{DEFAULT_DELIVERY_TIME, DEFAULT_TIMEZONE};
use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::store::operations::schedules::{compute_first_delivery, NotificationSchedule};
use crate::validation::{validate_delivery_time, validate_timezone};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_schedule).put(put_schedule))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SchedulePublic {
    delivery_time: String,
    timezone: String,
    enabled: bool,
    next_delivery_at: DateTime<Utc>,
}

impl From<&NotificationSchedule> for SchedulePublic {
    fn from(s: &NotificationSchedule) -> Self {
        Self {
            delivery_time: s.delivery_time.clone(),
            timezone: s.timezone.clone(),
            enabled: s.enabled,
            next_delivery_at: s.next_delivery_at,
        }
    }
}

async fn get_schedule(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let schedule = state
        .store()
        .get_schedule(&user.user_id)?
        .ok_or_else(|| AppError::not_found("No delivery schedule configured"))?;
    Ok(ok(SchedulePublic::from(&schedule)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertScheduleRequest {
    delivery_time: Option<String>,
    timezone: Option<String>,
    enabled: Option<bool>,
}

async fn put_schedule(
    user: AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UpsertScheduleRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let existing = state.store().get_schedule(&user.user_id)?;

    let delivery_time = req
        .delivery_time
        .or_else(|| existing.as_ref().map(|s| s.delivery_time.clone()))
        .unwrap_or_else(|| DEFAULT_DELIVERY_TIME.to_string());
    let timezone = req
        .timezone
        .or_else(|| existing.as_ref().map(|s| s.timezone.clone()))
        .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
    let enabled = req
        .enabled
        .or(existing.as_ref().map(|s| s.enabled))
        .unwrap_or(true);

    // 写入前校验——非法输入绝不落库
    if let Err(msg) = validate_delivery_time(&delivery_time) {
        return Err(AppError::bad_request("INVALID_DELIVERY_TIME", msg));
    }
    if let Err(msg) = validate_timezone(&timezone) {
        return Err(AppError::bad_request("INVALID_TIMEZONE", msg));
    }

    let now = Utc::now();
    let next_delivery_at = compute_first_delivery(&delivery_time, &timezone, now)?;

    let schedule = NotificationSchedule {
        user_id: user.user_id.clone(),
        delivery_time,
        timezone,
        enabled,
        next_delivery_at,
        created_at: existing.as_ref().map(|s| s.created_at).unwrap_or(now),
        updated_at: now,
    };
    state.store().upsert_schedule(&schedule)?;

    Ok(ok(SchedulePublic::from(&schedule)))
}
