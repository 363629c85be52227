use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use rivalwatch_core::PLACEHOLDER_USER_ID;
use rivalwatch_db::{DbError, SavedArticleRow};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct SavedArticleItem {
    id: Uuid,
    title: String,
    url: String,
    source: String,
    competitors: Vec<String>,
    published_at: DateTime<Utc>,
    saved_at: DateTime<Utc>,
    summary: Option<String>,
    image_url: Option<String>,
    author: Option<String>,
}

impl From<SavedArticleRow> for SavedArticleItem {
    fn from(row: SavedArticleRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            url: row.url,
            source: row.source,
            competitors: row.competitors,
            published_at: row.published_at,
            saved_at: row.saved_at,
            summary: row.summary,
            image_url: row.image_url,
            author: row.author,
        }
    }
}

/// Outcome of a save or unsave, echoed back so the client can settle its
/// optimistic toggle state.
#[derive(Debug, Serialize)]
pub(super) struct SaveState {
    article_id: Uuid,
    saved: bool,
}

pub(super) async fn list_saved(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<SavedArticleItem>>>, ApiError> {
    let rows = rivalwatch_db::list_saved_articles(&state.pool, PLACEHOLDER_USER_ID)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows.into_iter().map(SavedArticleItem::from).collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn save_article(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(article_id): Path<Uuid>,
) -> Result<Json<ApiResponse<SaveState>>, ApiError> {
    // Check the article exists up front; the foreign key would reject the
    // save anyway, but this way an unknown id gets a 404 instead of a 500.
    if let Err(e) = rivalwatch_db::get_article(&state.pool, article_id).await {
        return Err(match e {
            DbError::NotFound => ApiError::new(req_id.0, "not_found", "article not found"),
            other => map_db_error(req_id.0, &other),
        });
    }

    let saved = rivalwatch_db::toggle_save(&state.pool, article_id, PLACEHOLDER_USER_ID, false)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: SaveState { article_id, saved },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn unsave_article(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(article_id): Path<Uuid>,
) -> Result<Json<ApiResponse<SaveState>>, ApiError> {
    let saved = rivalwatch_db::toggle_save(&state.pool, article_id, PLACEHOLDER_USER_ID, true)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: SaveState { article_id, saved },
        meta: ResponseMeta::new(req_id.0),
    }))
}
