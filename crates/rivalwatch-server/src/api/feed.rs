use axum::{extract::State, Extension, Json};
use serde::Serialize;

use rivalwatch_core::{FacetVocabulary, COARSE_FETCH_HOURS, SELECTABLE_HOURS};
use rivalwatch_db::{ArticleFilters, DEFAULT_ARTICLE_LIMIT};

use crate::middleware::RequestId;

use super::{articles::ArticleItem, map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

/// Everything the dashboard needs in one request: the coarse article window,
/// the facet vocabulary, headline stats, and the window parameters a client
/// needs to narrow the feed locally.
#[derive(Debug, Serialize)]
pub(super) struct FeedData {
    pub articles: Vec<ArticleItem>,
    pub facets: FacetVocabulary,
    pub stats: FeedStats,
    pub fetch_hours: i32,
    pub selectable_hours: Vec<i32>,
}

#[derive(Debug, Serialize)]
pub(super) struct FeedStats {
    pub total_articles: usize,
    pub competitors_tracked: usize,
    pub data_sources: usize,
}

pub(super) async fn get_feed(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<FeedData>>, ApiError> {
    // Fetch at the widest selectable window; narrowing happens client-side.
    let filters = ArticleFilters {
        hours: Some(COARSE_FETCH_HOURS),
        limit: Some(DEFAULT_ARTICLE_LIMIT),
        ..ArticleFilters::default()
    };

    let rows = rivalwatch_db::list_articles(&state.pool, filters)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let facets = match rivalwatch_db::list_facet_rows(&state.pool).await {
        Ok(facet_rows) => {
            FacetVocabulary::from_rows(facet_rows.into_iter().map(|r| (r.competitors, r.source)))
        }
        Err(e) => {
            tracing::warn!(error = %e, "facet scan failed; feed degrades to empty vocabulary");
            FacetVocabulary::default()
        }
    };

    let articles: Vec<ArticleItem> = rows.into_iter().map(ArticleItem::from).collect();
    let stats = FeedStats {
        total_articles: articles.len(),
        competitors_tracked: facets.competitors.len(),
        data_sources: facets.sources.len(),
    };

    Ok(Json(ApiResponse {
        data: FeedData {
            articles,
            facets,
            stats,
            fetch_hours: COARSE_FETCH_HOURS,
            selectable_hours: SELECTABLE_HOURS.to_vec(),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
