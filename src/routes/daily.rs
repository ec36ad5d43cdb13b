use axum::extract::{Query, State};
use axum::routing::get;
use axum::Router;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::response::{ok, AppError};
use crate::selection::band::DifficultyBand;
use crate::selection::{global, personalized};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(global_word))
        .route("/me", get(personalized_word))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DailyWordQuery {
    date: Option<String>,
    difficulty: Option<String>,
}

impl DailyWordQuery {
    fn date(&self) -> Result<NaiveDate, AppError> {
        match &self.date {
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                AppError::bad_request("INVALID_DATE", "Date must be in YYYY-MM-DD format")
            }),
            None => Ok(Utc::now().date_naive()),
        }
    }

    fn difficulty(&self) -> Result<Option<DifficultyBand>, AppError> {
        match &self.difficulty {
            Some(raw) => raw
                .parse::<DifficultyBand>()
                .map(Some)
                .map_err(|_| {
                    AppError::bad_request(
                        "INVALID_DIFFICULTY",
                        "Difficulty must be one of easy, balanced, advanced",
                    )
                }),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GlobalWordResponse {
    date: String,
    word_id: String,
    text: Option<String>,
    was_newly_created: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserWordResponse {
    date: String,
    word_id: String,
    text: Option<String>,
    requested_difficulty: Option<DifficultyBand>,
    effective_difficulty: Option<DifficultyBand>,
    used_fallback: bool,
    was_newly_created: bool,
}

/// 共享的每日一词。无需认证——对所有人都是同一个词。
async fn global_word(
    Query(query): Query<DailyWordQuery>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let date = query.date()?;
    let outcome = global::get_or_assign_global_word(state.store(), date)?;

    let text = state
        .store()
        .get_word_entry(&outcome.assignment.word_id)?
        .map(|entry| entry.text);

    Ok(ok(GlobalWordResponse {
        date: outcome.assignment.date,
        word_id: outcome.assignment.word_id,
        text,
        was_newly_created: outcome.newly_created,
    }))
}

async fn personalized_word(
    user: AuthUser,
    Query(query): Query<DailyWordQuery>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let date = query.date()?;
    let requested = query.difficulty()?;

    let outcome =
        personalized::get_or_assign_user_word(state.store(), &user.user_id, date, requested)?;

    let text = state
        .store()
        .get_word_entry(&outcome.assignment.word_id)?
        .map(|entry| entry.text);

    Ok(ok(UserWordResponse {
        date: outcome.assignment.date.clone(),
        word_id: outcome.assignment.word_id.clone(),
        text,
        requested_difficulty: outcome.assignment.requested_band,
        effective_difficulty: outcome.assignment.effective_band,
        used_fallback: outcome.assignment.used_fallback(),
        was_newly_created: outcome.newly_created,
    }))
}
