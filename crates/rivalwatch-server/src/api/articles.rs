use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rivalwatch_core::FacetVocabulary;
use rivalwatch_db::{ArticleFilters, ArticleRow};

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct ArticlesQuery {
    pub hours: Option<i32>,
    /// Comma-separated competitor tags, e.g. `?competitors=acme,globex`.
    pub competitors: Option<String>,
    /// Comma-separated source names.
    pub sources: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct ArticleItem {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub source: String,
    pub competitors: Vec<String>,
    pub published_at: DateTime<Utc>,
    pub scraped_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub author: Option<String>,
}

impl From<ArticleRow> for ArticleItem {
    fn from(row: ArticleRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            url: row.url,
            source: row.source,
            competitors: row.competitors,
            published_at: row.published_at,
            scraped_at: row.scraped_at,
            created_at: row.created_at,
            summary: row.summary,
            image_url: row.image_url,
            author: row.author,
        }
    }
}

/// Splits a comma-separated query value into a filter list, treating an
/// empty or all-blank value as no filter at all.
fn parse_list(raw: Option<&str>) -> Option<Vec<String>> {
    let values: Vec<String> = raw?
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

pub(super) async fn list_articles(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ArticlesQuery>,
) -> Result<Json<ApiResponse<Vec<ArticleItem>>>, ApiError> {
    let filters = ArticleFilters {
        hours: query.hours,
        competitors: parse_list(query.competitors.as_deref()),
        sources: parse_list(query.sources.as_deref()),
        limit: Some(normalize_limit(query.limit)),
    };

    let rows = rivalwatch_db::list_articles(&state.pool, filters)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows.into_iter().map(ArticleItem::from).collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Facet vocabulary for the filter sidebar. A store failure here degrades to
/// an empty vocabulary instead of failing the request; the feed itself is
/// still usable without filter options.
pub(super) async fn list_facets(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<FacetVocabulary>> {
    let data = match rivalwatch_db::list_facet_rows(&state.pool).await {
        Ok(rows) => FacetVocabulary::from_rows(rows.into_iter().map(|r| (r.competitors, r.source))),
        Err(e) => {
            tracing::warn!(error = %e, "facet scan failed; returning empty vocabulary");
            FacetVocabulary::default()
        }
    };

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}
