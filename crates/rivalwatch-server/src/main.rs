mod api;
mod middleware;
mod trigger;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::TriggerAuth,
    trigger::TriggerClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(rivalwatch_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = rivalwatch_db::PoolConfig::from_app_config(&config);
    let pool = rivalwatch_db::connect_pool(&config.database_url, pool_config).await?;
    rivalwatch_db::run_migrations(&pool).await?;

    let auth = TriggerAuth::from_secret(
        config.cron_secret.clone(),
        matches!(config.env, rivalwatch_core::Environment::Development),
    )?;
    let trigger = TriggerClient::from_config(&config)?;
    if !trigger.is_configured() {
        tracing::warn!("no scrape trigger configured; /api/v1/scrape/trigger will answer 501");
    }

    let app = build_app(AppState { pool, trigger }, auth, default_rate_limit_state());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
