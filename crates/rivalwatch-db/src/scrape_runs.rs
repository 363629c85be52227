//! Read-only view over the `scrape_runs` table.
//!
//! Rows are written by the external scrapers after each sweep; this
//! side only lists them for run-history displays.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `scrape_runs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScrapeRunRow {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Null while the run is still in `running` status.
    pub completed_at: Option<DateTime<Utc>>,
    pub articles_found: i32,
    pub articles_added: i32,
    /// One of `running`, `completed`, `failed` (schema check constraint).
    pub status: String,
    pub error_message: Option<String>,
}

/// Returns the most recent `limit` runs, ordered by `started_at DESC`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_scrape_runs(pool: &PgPool, limit: i64) -> Result<Vec<ScrapeRunRow>, DbError> {
    let rows = sqlx::query_as::<_, ScrapeRunRow>(
        "SELECT \
             id, started_at, completed_at, articles_found, articles_added, \
             status, error_message \
         FROM scrape_runs \
         ORDER BY started_at DESC, id DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
