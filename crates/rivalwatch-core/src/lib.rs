//! Shared domain types for rivalwatch.
//!
//! Everything here is plain data plus pure functions: articles, the
//! client-side filter model, facet vocabularies, relative-time
//! formatting, and application configuration. Persistence lives in
//! `rivalwatch-db`, HTTP in `rivalwatch-server`.

pub mod app_config;
pub mod config;
pub mod facets;
pub mod feed;
pub mod timefmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use facets::FacetVocabulary;
pub use feed::{FeedView, FilterState, COARSE_FETCH_HOURS, DEFAULT_FILTER_HOURS, SELECTABLE_HOURS};
pub use timefmt::time_ago;

/// Fixed identity under which saves are recorded until per-user
/// authentication exists. Every saved-article operation that does not
/// receive an explicit user takes this one.
pub const PLACEHOLDER_USER_ID: Uuid = Uuid::nil();

/// A single scraped news article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub source: String,
    /// Competitor tags attached during ingestion. Empty when the
    /// scraper matched no tracked competitor by name.
    pub competitors: Vec<String>,
    pub published_at: DateTime<Utc>,
    pub scraped_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub author: Option<String>,
}

/// Errors raised while assembling [`AppConfig`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
