//! Command handlers for the CLI.
//!
//! These are called from `main` after the database pool is established.
//! The feed command fetches one coarse window and narrows it in memory,
//! the same flow the dashboard uses, so flipping filters needs no fresh
//! queries.

use chrono::Utc;
use uuid::Uuid;

use rivalwatch_core::{
    time_ago, FacetVocabulary, FeedView, FilterState, COARSE_FETCH_HOURS, PLACEHOLDER_USER_ID,
};
use rivalwatch_db::{ArticleFilters, DbError};

/// Truncate long titles for single-line table display.
fn short_title(title: &str) -> String {
    if title.chars().count() > 60 {
        format!("{}...", title.chars().take(60).collect::<String>())
    } else {
        title.to_string()
    }
}

/// Fetch a working set covering `fetch_hours` hours. Only the time bound is
/// pushed to the store; competitor and source narrowing stays local.
async fn fetch_view(pool: &sqlx::PgPool, fetch_hours: i32) -> anyhow::Result<FeedView> {
    let rows = rivalwatch_db::list_articles(
        pool,
        ArticleFilters {
            hours: Some(fetch_hours),
            ..ArticleFilters::default()
        },
    )
    .await?;

    Ok(FeedView::new(
        rows.into_iter().map(Into::into).collect(),
        fetch_hours,
    ))
}

/// Show the filtered article feed.
///
/// Fetches one coarse window (the widest selectable range) and applies the
/// competitor/source/time selection in memory, re-fetching only when the
/// requested window is wider than the working set.
///
/// # Errors
///
/// Returns an error if an article fetch fails. A facet scan failure only
/// drops the tracking summary line.
pub(crate) async fn run_feed(
    pool: &sqlx::PgPool,
    hours: i32,
    competitors: Vec<String>,
    sources: Vec<String>,
) -> anyhow::Result<()> {
    let filters = FilterState {
        competitors: competitors.into_iter().collect(),
        sources: sources.into_iter().collect(),
        hours,
    };

    let mut view = fetch_view(pool, COARSE_FETCH_HOURS).await?;
    if !view.covers(&filters) {
        view = fetch_view(pool, filters.hours).await?;
    }

    match rivalwatch_db::list_facet_rows(pool).await {
        Ok(rows) => {
            let vocabulary =
                FacetVocabulary::from_rows(rows.into_iter().map(|r| (r.competitors, r.source)));
            println!(
                "tracking {} competitors across {} sources",
                vocabulary.competitors.len(),
                vocabulary.sources.len()
            );
        }
        Err(e) => {
            tracing::warn!(error = %e, "facet scan failed; skipping the tracking summary");
        }
    }

    let now = Utc::now();
    let visible = view.visible(&filters, now);

    if visible.is_empty() {
        println!("no articles match within the last {hours} hours");
        return Ok(());
    }

    println!(
        "{} of {} fetched articles shown",
        visible.len(),
        view.total()
    );
    println!();
    let header = format!("{:<16}{:<14}TITLE", "PUBLISHED", "SOURCE");
    println!("{header}");
    for article in visible {
        let tags = if article.competitors.is_empty() {
            String::new()
        } else {
            format!("  [{}]", article.competitors.join(", "))
        };
        println!(
            "{:<16}{:<14}{}{}",
            time_ago(article.published_at, now),
            article.source,
            short_title(&article.title),
            tags
        );
    }

    Ok(())
}

/// List saved articles, newest save first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_saved(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let rows = rivalwatch_db::list_saved_articles(pool, PLACEHOLDER_USER_ID).await?;

    if rows.is_empty() {
        println!("no saved articles; run `save <article-id>` first");
        return Ok(());
    }

    let now = Utc::now();
    let header = format!("{:<16}{:<14}{:<38}TITLE", "SAVED", "SOURCE", "ID");
    println!("{header}");
    for row in &rows {
        println!(
            "{:<16}{:<14}{:<38}{}",
            time_ago(row.saved_at, now),
            row.source,
            row.id,
            short_title(&row.title)
        );
    }

    Ok(())
}

/// Save an article for the shared placeholder identity.
///
/// Saving an already-saved article is reported, not treated as an error;
/// the store's uniqueness constraint arbitrates races.
///
/// # Errors
///
/// Returns an error if the article id is unknown or the write fails.
pub(crate) async fn run_save(pool: &sqlx::PgPool, article_id: Uuid) -> anyhow::Result<()> {
    let article = match rivalwatch_db::get_article(pool, article_id).await {
        Ok(article) => article,
        Err(DbError::NotFound) => anyhow::bail!("article {article_id} not found"),
        Err(e) => return Err(e.into()),
    };

    if rivalwatch_db::save_article(pool, article_id, PLACEHOLDER_USER_ID).await? {
        println!("saved: {}", article.title);
    } else {
        println!("already saved: {}", article.title);
    }

    Ok(())
}

/// Remove an article from the saved list.
///
/// Unsaving an article that was never saved succeeds quietly; the end state
/// is the same either way.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub(crate) async fn run_unsave(pool: &sqlx::PgPool, article_id: Uuid) -> anyhow::Result<()> {
    let removed = rivalwatch_db::unsave_article(pool, article_id, PLACEHOLDER_USER_ID).await?;

    if removed > 0 {
        println!("unsaved {article_id}");
    } else {
        println!("{article_id} was not in the saved list");
    }

    Ok(())
}

/// Show recent scrape runs, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_runs(pool: &sqlx::PgPool, limit: i64) -> anyhow::Result<()> {
    let runs = rivalwatch_db::list_scrape_runs(pool, limit).await?;

    if runs.is_empty() {
        println!("no scrape runs recorded yet");
        return Ok(());
    }

    let now = Utc::now();
    let header = format!(
        "{:<16}{:<11}{:<7}{:<7}NOTES",
        "STARTED", "STATUS", "FOUND", "ADDED"
    );
    println!("{header}");
    for run in &runs {
        let notes = run.error_message.as_deref().unwrap_or("\u{2014}");
        println!(
            "{:<16}{:<11}{:<7}{:<7}{}",
            time_ago(run.started_at, now),
            run.status,
            run.articles_found,
            run.articles_added,
            notes
        );
    }

    Ok(())
}
