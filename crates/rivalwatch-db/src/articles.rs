//! Read-model queries over the `articles` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// Default result cap when the caller does not supply one.
pub const DEFAULT_ARTICLE_LIMIT: i64 = 100;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `articles` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ArticleRow {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub source: String,
    /// The schema defines this as `TEXT[] NOT NULL DEFAULT '{}'`.
    pub competitors: Vec<String>,
    pub published_at: DateTime<Utc>,
    pub scraped_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub author: Option<String>,
}

impl From<ArticleRow> for rivalwatch_core::Article {
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

/// One `(competitors, source)` pair per stored article, the raw input
/// to facet aggregation.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FacetRow {
    pub competitors: Vec<String>,
    pub source: String,
}

/// Input filters for article listing.
///
/// `None` on any field disables that dimension. Empty competitor or
/// source lists are treated as absent, matching the feed's
/// empty-set-means-everything convention. `limit` is `None` for the
/// default cap of 100.
#[derive(Debug, Clone, Default)]
pub struct ArticleFilters {
    pub hours: Option<i32>,
    pub competitors: Option<Vec<String>>,
    pub sources: Option<Vec<String>>,
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns articles passing every supplied filter, newest first.
///
/// The time window is inclusive: an article published exactly `hours`
/// ago is returned. Competitor filtering is array overlap, source
/// filtering membership.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_articles(
    pool: &PgPool,
    filters: ArticleFilters,
) -> Result<Vec<ArticleRow>, DbError> {
    let competitors = filters.competitors.filter(|list| !list.is_empty());
    let sources = filters.sources.filter(|list| !list.is_empty());

    let rows = sqlx::query_as::<_, ArticleRow>(
        "SELECT \
             id, title, url, source, competitors, published_at, \
             scraped_at, created_at, summary, image_url, author \
         FROM articles \
         WHERE ($1::INT IS NULL OR published_at >= NOW() - make_interval(hours => $1)) \
           AND ($2::TEXT[] IS NULL OR competitors && $2) \
           AND ($3::TEXT[] IS NULL OR source = ANY($3)) \
         ORDER BY published_at DESC, id DESC \
         LIMIT COALESCE($4, 100)",
    )
    .bind(filters.hours)
    .bind(competitors)
    .bind(sources)
    .bind(filters.limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetches a single article by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists with the given `id`, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_article(pool: &PgPool, id: Uuid) -> Result<ArticleRow, DbError> {
    let row = sqlx::query_as::<_, ArticleRow>(
        "SELECT \
             id, title, url, source, competitors, published_at, \
             scraped_at, created_at, summary, image_url, author \
         FROM articles \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Returns the `(competitors, source)` pair of every stored article,
/// unfiltered. Feed aggregation reduces these to sorted vocabularies;
/// the corpus stays small enough that the full scan is the simplest
/// correct read.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_facet_rows(pool: &PgPool) -> Result<Vec<FacetRow>, DbError> {
    let rows = sqlx::query_as::<_, FacetRow>("SELECT competitors, source FROM articles")
        .fetch_all(pool)
        .await?;

    Ok(rows)
}
