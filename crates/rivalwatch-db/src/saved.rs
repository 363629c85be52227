//! Save-state reconciliation over the `saved_articles` table.
//!
//! Both transitions are idempotent so optimistic UI toggles and
//! concurrent double-clicks converge on the same row state: saving an
//! already-saved article reports success without a second row, and
//! unsaving an absent one deletes nothing.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A saved-list row: the joined article plus when it was saved.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SavedArticleRow {
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
    pub saved_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Saves an article for a user.
///
/// Returns `Ok(true)` when a row was inserted and `Ok(false)` when the
/// article was already saved: the `(article_id, user_id)` unique
/// constraint rejects the duplicate (SQLSTATE 23505) and that outcome
/// still leaves the store in the requested state. Any other failure,
/// including an unknown `article_id` tripping the foreign key,
/// propagates.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails for any reason other
/// than the duplicate-save unique violation.
pub async fn save_article(pool: &PgPool, article_id: Uuid, user_id: Uuid) -> Result<bool, DbError> {
    let share_token = Uuid::new_v4().simple().to_string();

    let result = sqlx::query(
        "INSERT INTO saved_articles (article_id, user_id, share_token) \
         VALUES ($1, $2, $3)",
    )
    .bind(article_id)
    .bind(user_id)
    .bind(share_token)
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(true),
        Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
            Ok(false)
        }
        Err(e) => Err(DbError::from(e)),
    }
}

/// Removes a user's save on an article.
///
/// Returns the number of rows deleted; 0 means the article was not
/// saved, which is still success.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn unsave_article(pool: &PgPool, article_id: Uuid, user_id: Uuid) -> Result<u64, DbError> {
    let result = sqlx::query(
        "DELETE FROM saved_articles \
         WHERE article_id = $1 AND user_id = $2",
    )
    .bind(article_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Flips an article's save state and returns the new state.
///
/// `currently_saved` is the caller's belief; the store constraint is
/// what actually arbitrates, so a stale belief (another client raced
/// this one) still converges on the requested end state.
///
/// # Errors
///
/// Returns [`DbError`] if the underlying transition fails.
pub async fn toggle_save(
    pool: &PgPool,
    article_id: Uuid,
    user_id: Uuid,
    currently_saved: bool,
) -> Result<bool, DbError> {
    if currently_saved {
        unsave_article(pool, article_id, user_id).await?;
        Ok(false)
    } else {
        save_article(pool, article_id, user_id).await?;
        Ok(true)
    }
}

/// Returns a user's saved articles, most recently saved first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_saved_articles(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<SavedArticleRow>, DbError> {
    let rows = sqlx::query_as::<_, SavedArticleRow>(
        "SELECT \
             a.id, a.title, a.url, a.source, a.competitors, a.published_at, \
             a.scraped_at, a.created_at, a.summary, a.image_url, a.author, \
             sa.saved_at \
         FROM saved_articles sa \
         JOIN articles a ON a.id = sa.article_id \
         WHERE sa.user_id = $1 \
         ORDER BY sa.saved_at DESC, sa.id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
