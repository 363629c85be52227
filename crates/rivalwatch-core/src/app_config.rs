use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub cron_secret: Option<String>,
    pub github_token: Option<String>,
    pub github_repo: Option<String>,
    pub github_workflow: String,
    pub scraper_webhook_url: Option<String>,
    pub scraper_webhook_secret: Option<String>,
    pub trigger_request_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("cron_secret", &self.cron_secret.as_ref().map(|_| "[redacted]"))
            .field(
                "github_token",
                &self.github_token.as_ref().map(|_| "[redacted]"),
            )
            .field("github_repo", &self.github_repo)
            .field("github_workflow", &self.github_workflow)
            .field("scraper_webhook_url", &self.scraper_webhook_url)
            .field(
                "scraper_webhook_secret",
                &self.scraper_webhook_secret.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "trigger_request_timeout_secs",
                &self.trigger_request_timeout_secs,
            )
            .finish()
    }
}
