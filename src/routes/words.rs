use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::Router;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::{AdminAuthUser, AuthUser};
use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::extractors::JsonBody;
use crate::response::{created, ok, paginated, AppError};
use crate::selection::band::DifficultyBand;
use crate::state::AppState;
use crate::store::operations::words::{EnrichmentStatus, WordPoolEntry};

/// 对外 API 使用的词条视图
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordPublic {
    id: String,
    text: String,
    enabled: bool,
    tier: Option<i64>,
    band: DifficultyBand,
    source: String,
    enrichment: EnrichmentStatus,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&WordPoolEntry> for WordPublic {
    fn from(w: &WordPoolEntry) -> Self {
        Self {
            id: w.id.clone(),
            text: w.text.clone(),
            enabled: w.enabled,
            tier: w.tier,
            band: w.band(),
            source: w.source.clone(),
            enrichment: w.enrichment,
            created_at: w.created_at,
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_words).post(create_word))
        .route("/count", get(count_words))
        .route("/:id", get(get_word).put(update_word))
        .route("/:id/enrichment", put(set_enrichment))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListWordsQuery {
    page: Option<u64>,
    per_page: Option<u64>,
}

impl ListWordsQuery {
    fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    fn per_page(&self) -> u64 {
        self.per_page
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

async fn list_words(
    _user: AuthUser,
    Query(query): Query<ListWordsQuery>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let page = query.page();
    let per_page = query.per_page();
    let offset = ((page - 1) * per_page) as usize;
    let limit = per_page as usize;

    let total = state.store().count_word_entries()?;
    let items = state.store().list_word_entries(limit, offset)?;
    let items: Vec<WordPublic> = items.iter().map(WordPublic::from).collect();
    Ok(paginated(items, total, page, per_page))
}

async fn count_words(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let total = state.store().count_word_entries()?;
    Ok(ok(serde_json::json!({"total": total})))
}

async fn get_word(
    _user: AuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let entry = state
        .store()
        .get_word_entry(&id)?
        .ok_or_else(|| AppError::not_found("Word not found"))?;
    Ok(ok(WordPublic::from(&entry)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateWordRequest {
    text: String,
    tier: Option<i64>,
    source: Option<String>,
}

async fn create_word(
    _admin: AdminAuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateWordRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let text = req.text.trim();
    if text.is_empty() || text.len() > 100 {
        return Err(AppError::bad_request(
            "INVALID_WORD_TEXT",
            "Word text must be 1-100 characters",
        ));
    }

    let entry = WordPoolEntry {
        id: uuid::Uuid::new_v4().to_string(),
        text: text.to_string(),
        enabled: true,
        tier: req.tier,
        source: req.source.unwrap_or_else(|| "manual".to_string()),
        enrichment: EnrichmentStatus::Pending,
        created_at: Utc::now(),
    };
    state.store().upsert_word_entry(&entry)?;
    Ok(created(WordPublic::from(&entry)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateWordRequest {
    enabled: Option<bool>,
    tier: Option<i64>,
}

async fn update_word(
    _admin: AdminAuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UpdateWordRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let mut entry = state
        .store()
        .get_word_entry(&id)?
        .ok_or_else(|| AppError::not_found("Word not found"))?;

    if let Some(enabled) = req.enabled {
        entry.enabled = enabled;
    }
    if req.tier.is_some() {
        entry.tier = req.tier;
    }
    state.store().upsert_word_entry(&entry)?;
    Ok(ok(WordPublic::from(&entry)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetEnrichmentRequest {
    status: EnrichmentStatus,
}

/// 富化流水线的回写入口：仅更新状态，词条本身不归本服务管理
async fn set_enrichment(
    _admin: AdminAuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SetEnrichmentRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let entry = state.store().set_enrichment_status(&id, req.status)?;
    Ok(ok(WordPublic::from(&entry)))
}
