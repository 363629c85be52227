//! Dispatch client for the out-of-process scrape pipeline.
//!
//! The scrapers themselves run elsewhere (a GitHub Actions workflow or an
//! external webhook service); this module only kicks them off. GitHub
//! dispatch is preferred when both `GITHUB_TOKEN` and `GITHUB_REPO` are
//! configured, otherwise the webhook URL is used, otherwise dispatching
//! reports [`TriggerError::NotConfigured`].

use std::time::Duration;

use chrono::Utc;
use reqwest::{header, Client, StatusCode};
use thiserror::Error;

use rivalwatch_core::AppConfig;

const GITHUB_API_BASE_URL: &str = "https://api.github.com";

/// Branch the GitHub workflow dispatch runs against.
const WORKFLOW_REF: &str = "main";

/// Errors returned by the scrape dispatch client.
#[derive(Debug, Error)]
pub enum TriggerError {
    /// Neither GitHub dispatch nor a webhook is configured.
    #[error("no scraper trigger configured; set GITHUB_TOKEN + GITHUB_REPO or SCRAPER_WEBHOOK_URL")]
    NotConfigured,

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The dispatch target answered with a non-success status.
    #[error("scrape dispatch rejected: HTTP {status}")]
    Dispatch { status: StatusCode },
}

/// Which mechanism a successful dispatch went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerTarget {
    GithubWorkflow,
    Webhook,
}

impl TriggerTarget {
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::GithubWorkflow => "Scraper workflow triggered via GitHub Actions",
            Self::Webhook => "Scraper webhook triggered",
        }
    }
}

#[derive(Clone)]
struct GithubDispatch {
    token: String,
    repo: String,
    workflow: String,
}

#[derive(Clone)]
struct WebhookDispatch {
    url: String,
    secret: Option<String>,
}

/// Client that dispatches scrape runs to whichever mechanism is configured.
///
/// Use [`TriggerClient::from_config`] in production or
/// [`TriggerClient::with_github_base_url`] to point GitHub dispatch at a mock
/// server in tests.
#[derive(Clone)]
pub struct TriggerClient {
    client: Client,
    github_base_url: String,
    github: Option<GithubDispatch>,
    webhook: Option<WebhookDispatch>,
}

impl TriggerClient {
    /// Creates a client pointed at the production GitHub API.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, TriggerError> {
        Self::with_github_base_url(config, GITHUB_API_BASE_URL)
    }

    /// Creates a client with a custom GitHub base URL (for testing with
    /// wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_github_base_url(
        config: &AppConfig,
        github_base_url: &str,
    ) -> Result<Self, TriggerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.trigger_request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("rivalwatch/0.1 (competitor-news)")
            .build()?;

        let github = match (&config.github_token, &config.github_repo) {
            (Some(token), Some(repo)) => Some(GithubDispatch {
                token: token.clone(),
                repo: repo.clone(),
                workflow: config.github_workflow.clone(),
            }),
            _ => None,
        };

        let webhook = config
            .scraper_webhook_url
            .as_ref()
            .map(|url| WebhookDispatch {
                url: url.clone(),
                secret: config.scraper_webhook_secret.clone(),
            });

        Ok(Self {
            client,
            github_base_url: github_base_url.trim_end_matches('/').to_owned(),
            github,
            webhook,
        })
    }

    /// Whether any dispatch mechanism is configured at all.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.github.is_some() || self.webhook.is_some()
    }

    /// Kicks off a scrape run and reports which mechanism handled it.
    ///
    /// # Errors
    ///
    /// - [`TriggerError::NotConfigured`] when no mechanism is configured.
    /// - [`TriggerError::Http`] on network failure.
    /// - [`TriggerError::Dispatch`] when the target rejects the request.
    pub async fn dispatch(&self) -> Result<TriggerTarget, TriggerError> {
        if let Some(github) = &self.github {
            self.dispatch_github(github).await?;
            return Ok(TriggerTarget::GithubWorkflow);
        }

        if let Some(webhook) = &self.webhook {
            self.dispatch_webhook(webhook).await?;
            return Ok(TriggerTarget::Webhook);
        }

        Err(TriggerError::NotConfigured)
    }

    async fn dispatch_github(&self, github: &GithubDispatch) -> Result<(), TriggerError> {
        let response = self
            .client
            .post(self.github_dispatch_url(github))
            .bearer_auth(&github.token)
            .header(header::ACCEPT, "application/vnd.github.v3+json")
            .json(&serde_json::json!({ "ref": WORKFLOW_REF }))
            .send()
            .await?;

        Self::check_dispatch_status(response.status())
    }

    async fn dispatch_webhook(&self, webhook: &WebhookDispatch) -> Result<(), TriggerError> {
        let body = serde_json::json!({
            "action": "run_scrapers",
            "timestamp": Utc::now().to_rfc3339(),
        });

        let mut request = self.client.post(&webhook.url).json(&body);
        if let Some(secret) = &webhook.secret {
            request = request.bearer_auth(secret);
        }

        let response = request.send().await?;
        Self::check_dispatch_status(response.status())
    }

    fn github_dispatch_url(&self, github: &GithubDispatch) -> String {
        format!(
            "{}/repos/{}/actions/workflows/{}/dispatches",
            self.github_base_url, github.repo, github.workflow
        )
    }

    /// GitHub answers `workflow_dispatch` with 204; webhook services vary, so
    /// any 2xx counts as accepted.
    fn check_dispatch_status(status: StatusCode) -> Result<(), TriggerError> {
        if status.is_success() {
            Ok(())
        } else {
            Err(TriggerError::Dispatch { status })
        }
    }
}
