use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;
use crate::trigger::TriggerError;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct ScrapeRunsQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct ScrapeRunItem {
    id: Uuid,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    articles_found: i32,
    articles_added: i32,
    status: String,
    error_message: Option<String>,
}

/// Trigger responses keep the `{success, message, timestamp}` contract the
/// cron caller and manual scripts already depend on, instead of the standard
/// `{data, meta}` envelope.
#[derive(Debug, Serialize)]
pub(super) struct TriggerStatus {
    success: bool,
    message: String,
    timestamp: DateTime<Utc>,
}

impl TriggerStatus {
    fn new(success: bool, message: impl Into<String>) -> Self {
        Self {
            success,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

pub(super) async fn list_scrape_runs(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ScrapeRunsQuery>,
) -> Result<Json<ApiResponse<Vec<ScrapeRunItem>>>, ApiError> {
    let rows = rivalwatch_db::list_scrape_runs(&state.pool, normalize_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| ScrapeRunItem {
            id: row.id,
            started_at: row.started_at,
            completed_at: row.completed_at,
            articles_found: row.articles_found,
            articles_added: row.articles_added,
            status: row.status,
            error_message: row.error_message,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Kicks off an out-of-process scrape run. Serves both `GET` (cron caller)
/// and `POST` (manual trigger); run rows appear later, written by the
/// scrapers themselves.
pub(super) async fn trigger_scrape(State(state): State<AppState>) -> impl IntoResponse {
    match state.trigger.dispatch().await {
        Ok(target) => {
            tracing::info!(mechanism = ?target, "scrape dispatch accepted");
            (
                StatusCode::OK,
                Json(TriggerStatus::new(true, target.describe())),
            )
        }
        Err(e @ TriggerError::NotConfigured) => (
            StatusCode::NOT_IMPLEMENTED,
            Json(TriggerStatus::new(false, e.to_string())),
        ),
        Err(e) => {
            tracing::error!(error = %e, "scrape dispatch failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(TriggerStatus::new(false, "scrape dispatch failed")),
            )
        }
    }
}
