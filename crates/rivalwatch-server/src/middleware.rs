use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Bearer-token auth settings for the scrape trigger endpoint.
#[derive(Debug, Clone)]
pub struct TriggerAuth {
    secret: Option<Arc<String>>,
    pub enabled: bool,
}

impl TriggerAuth {
    /// Builds trigger auth from the configured `CRON_SECRET` value.
    ///
    /// In development, a missing secret disables auth for local iteration.
    /// In non-development envs, a missing secret fails startup.
    pub fn from_secret(secret: Option<String>, is_development: bool) -> anyhow::Result<Self> {
        let secret = secret.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty());

        let Some(secret) = secret else {
            if is_development {
                tracing::warn!(
                    "CRON_SECRET not set; scrape trigger auth disabled in development environment"
                );
                return Ok(Self {
                    secret: None,
                    enabled: false,
                });
            }

            anyhow::bail!(
                "CRON_SECRET is required outside development; provide a bearer token for the scrape trigger"
            );
        };

        Ok(Self {
            secret: Some(Arc::new(secret)),
            enabled: true,
        })
    }

    /// Constant-time token comparison; must not short-circuit on the first
    /// mismatched byte.
    fn allows(&self, token: &str) -> bool {
        self.secret
            .as_deref()
            .is_some_and(|secret| bool::from(token.as_bytes().ct_eq(secret.as_bytes())))
    }
}

#[derive(Debug, Clone)]
struct RateLimitWindow {
    started_at: Instant,
    count: usize,
}

/// Sliding fixed-window limiter for simple API protection.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    state: Arc<Mutex<RateLimitWindow>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            state: Arc::new(Mutex::new(RateLimitWindow {
                started_at: Instant::now(),
                count: 0,
            })),
        }
    }
}

#[derive(Debug, Serialize)]
struct MiddlewareErrorBody {
    error: MiddlewareError,
}

#[derive(Debug, Serialize)]
struct MiddlewareError {
    code: &'static str,
    message: &'static str,
}

/// Denial body for the trigger endpoint, which keeps the `{success, message,
/// timestamp}` contract its external callers expect rather than the standard
/// error envelope.
#[derive(Debug, Serialize)]
struct TriggerDeniedBody {
    success: bool,
    message: &'static str,
    timestamp: DateTime<Utc>,
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware guarding the scrape trigger route when auth is enabled.
pub async fn require_trigger_auth(
    State(auth): State<TriggerAuth>,
    req: Request,
    next: Next,
) -> Response {
    if !auth.enabled {
        return next.run(req).await;
    }

    let token = extract_bearer_token(req.headers().get(AUTHORIZATION));

    match token {
        Some(token) if auth.allows(token) => next.run(req).await,
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(TriggerDeniedBody {
                success: false,
                message: "missing or invalid bearer token",
                timestamp: Utc::now(),
            }),
        )
            .into_response(),
    }
}

/// Middleware enforcing a fixed request-per-window limit.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let mut window = rate_limit.state.lock().await;
    let elapsed = window.started_at.elapsed();

    if elapsed >= rate_limit.window {
        window.started_at = Instant::now();
        window.count = 0;
    }

    if window.count >= rate_limit.max_requests {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(MiddlewareErrorBody {
                error: MiddlewareError {
                    code: "rate_limited",
                    message: "rate limit exceeded",
                },
            }),
        )
            .into_response();
    }

    window.count += 1;
    drop(window);

    next.run(req).await
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|s| !s.trim().is_empty())
}
