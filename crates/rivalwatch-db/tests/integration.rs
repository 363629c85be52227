//! Offline unit tests for rivalwatch-db pool configuration and row types.
//! These tests do not require a live database connection.

use chrono::Utc;
use rivalwatch_core::{AppConfig, Environment};
use rivalwatch_db::{ArticleFilters, ArticleRow, PoolConfig, SavedArticleRow, ScrapeRunRow};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use uuid::Uuid;

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        cron_secret: None,
        github_token: None,
        github_repo: None,
        github_workflow: "scrape.yml".to_string(),
        scraper_webhook_url: None,
        scraper_webhook_secret: None,
        trigger_request_timeout_secs: 30,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn article_filters_default_disables_every_dimension() {
    let filters = ArticleFilters::default();
    assert!(filters.hours.is_none());
    assert!(filters.competitors.is_none());
    assert!(filters.sources.is_none());
    assert!(filters.limit.is_none());
}

/// Compile-time smoke test: confirm that [`ArticleRow`] has all expected
/// fields with the correct types, and converts cleanly into the core
/// domain type. No database required.
#[test]
fn article_row_converts_to_core_article() {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let row = ArticleRow {
        id,
        title: "Acme launches sparkling line".to_string(),
        url: "https://example.com/acme-sparkling".to_string(),
        source: "wire".to_string(),
        competitors: vec!["acme".to_string()],
        published_at: now,
        scraped_at: now,
        created_at: now,
        summary: Some("A summary".to_string()),
        image_url: None,
        author: Some("Jo Reporter".to_string()),
    };

    let article = rivalwatch_core::Article::from(row);
    assert_eq!(article.id, id);
    assert_eq!(article.title, "Acme launches sparkling line");
    assert_eq!(article.source, "wire");
    assert_eq!(article.competitors, vec!["acme".to_string()]);
    assert_eq!(article.published_at, now);
    assert_eq!(article.summary.as_deref(), Some("A summary"));
    assert!(article.image_url.is_none());
    assert_eq!(article.author.as_deref(), Some("Jo Reporter"));
}

/// Compile-time smoke test: confirm that [`SavedArticleRow`] carries the
/// joined article fields plus `saved_at`. No database required.
#[test]
fn saved_article_row_has_expected_fields() {
    let now = Utc::now();
    let row = SavedArticleRow {
        id: Uuid::new_v4(),
        title: "Saved one".to_string(),
        url: "https://example.com/saved".to_string(),
        source: "blog".to_string(),
        competitors: vec![],
        published_at: now,
        scraped_at: now,
        created_at: now,
        summary: None,
        image_url: None,
        author: None,
        saved_at: now,
    };

    assert_eq!(row.title, "Saved one");
    assert_eq!(row.source, "blog");
    assert!(row.competitors.is_empty());
    assert_eq!(row.saved_at, now);
}

/// Compile-time smoke test: confirm that [`ScrapeRunRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn scrape_run_row_has_expected_fields() {
    let row = ScrapeRunRow {
        id: Uuid::new_v4(),
        started_at: Utc::now(),
        completed_at: None,
        articles_found: 12,
        articles_added: 3,
        status: "running".to_string(),
        error_message: None,
    };

    assert_eq!(row.articles_found, 12);
    assert_eq!(row.articles_added, 3);
    assert_eq!(row.status, "running");
    assert!(row.completed_at.is_none());
    assert!(row.error_message.is_none());
}
