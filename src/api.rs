use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use metrics::counter;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::auth;
use crate::config::AppConfig;
use crate::ingest::providers::{DevtoProvider, NewsApiProvider};
use crate::ingest::types::{Article, ContentProvider};
use crate::ingest::{aggregate, AggregateError};
use crate::limiter::FixedWindowLimiter;
use crate::payout::{compute_payouts, summarize, AuthorPayoutStat, PayoutSummary};
use crate::settings::{DashboardSettings, SettingsStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub limiter: Arc<FixedWindowLimiter>,
    pub providers: Arc<Vec<Arc<dyn ContentProvider>>>,
    pub client: reqwest::Client,
    pub settings: Arc<SettingsStore>,
}

impl AppState {
    /// Production wiring: real providers (news first, then blog), limiter
    /// on the system clock, settings at the configured path.
    pub fn new(config: Arc<AppConfig>) -> Self {
        let providers: Vec<Arc<dyn ContentProvider>> = vec![
            Arc::new(NewsApiProvider::new(&config.news_api_key)),
            Arc::new(DevtoProvider::new()),
        ];
        let limiter = FixedWindowLimiter::new(
            config.max_requests_per_window,
            Duration::from_millis(config.rate_window_ms),
        );
        let settings = SettingsStore::open(&config.settings_path);
        Self {
            limiter: Arc::new(limiter),
            providers: Arc::new(providers),
            client: reqwest::Client::new(),
            settings: Arc::new(settings),
            config,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/news", get(get_news))
        .route("/api/payouts", get(get_payouts))
        .route("/api/settings", get(get_settings).put(put_settings))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Error surface of the API, mapped straight to status + `{"error": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Too many requests. Please try again later.")]
    RateLimited,
    #[error("Admins only.")]
    Forbidden,
    #[error("{0}")]
    Aggregate(#[from] AggregateError),
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Aggregate(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Serialize)]
struct NewsResponse {
    articles: Vec<Article>,
}

/// `GET /api/news` — the aggregation endpoint. Limiter first; a rejected
/// call performs no upstream fetch.
async fn get_news(State(state): State<AppState>) -> Result<Response, ApiError> {
    if !state.limiter.check_and_consume() {
        counter!("aggregate_rate_limited_total").increment(1);
        return Err(ApiError::RateLimited);
    }

    let articles = aggregate(&state.client, &state.providers).await?;
    Ok(Json(NewsResponse { articles }).into_response())
}

#[derive(Debug, Deserialize)]
struct PayoutQuery {
    demo: Option<String>,
    #[serde(rename = "newsRate")]
    news_rate: Option<f64>,
    #[serde(rename = "blogRate")]
    blog_rate: Option<f64>,
}

#[derive(Serialize)]
struct PayoutResponse {
    authors: Vec<AuthorPayoutStat>,
    summary: PayoutSummary,
    #[serde(rename = "newsRate")]
    news_rate: f64,
    #[serde(rename = "blogRate")]
    blog_rate: f64,
}

/// `GET /api/payouts` — admin-gated payout report over the merged feed.
///
/// Identity arrives as an opaque `x-user-email` header from the session
/// boundary; `?demo=true` is the demo override. Rates come from query
/// overrides or the stored settings; the computed grand total is persisted
/// for display continuity (query overrides themselves are not).
async fn get_payouts(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(q): Query<PayoutQuery>,
) -> Result<Json<PayoutResponse>, ApiError> {
    let email = headers.get("x-user-email").and_then(|v| v.to_str().ok());
    let demo = q.demo.as_deref() == Some("true");
    if !auth::is_admin(email, demo, &state.config.admins) {
        return Err(ApiError::Forbidden);
    }

    // Same aggregation step as /api/news, so the same window applies.
    if !state.limiter.check_and_consume() {
        counter!("aggregate_rate_limited_total").increment(1);
        return Err(ApiError::RateLimited);
    }

    let articles = aggregate(&state.client, &state.providers).await?;

    let stored = state.settings.get();
    let news_rate = q.news_rate.unwrap_or(stored.news_rate);
    let blog_rate = q.blog_rate.unwrap_or(stored.blog_rate);

    let authors = compute_payouts(&articles, news_rate, blog_rate);
    let summary = summarize(&authors);

    if let Err(e) = state
        .settings
        .update(|s| s.total_payout_amount = summary.total_payout)
    {
        tracing::warn!(error = ?e, "failed to persist payout total");
    }

    Ok(Json(PayoutResponse {
        authors,
        summary,
        news_rate,
        blog_rate,
    }))
}

async fn get_settings(State(state): State<AppState>) -> Json<DashboardSettings> {
    Json(state.settings.get())
}

#[derive(Debug, Deserialize)]
struct SettingsUpdate {
    theme: Option<String>,
    #[serde(rename = "newsRate")]
    news_rate: Option<f64>,
    #[serde(rename = "blogRate")]
    blog_rate: Option<f64>,
}

/// `PUT /api/settings` — partial update; the whole record is rewritten on
/// disk. The payout total is computed, not settable.
async fn put_settings(
    State(state): State<AppState>,
    Json(body): Json<SettingsUpdate>,
) -> Result<Json<DashboardSettings>, ApiError> {
    let updated = state
        .settings
        .update(|s| {
            if let Some(theme) = body.theme {
                s.theme = theme;
            }
            if let Some(rate) = body.news_rate {
                s.news_rate = rate;
            }
            if let Some(rate) = body.blog_rate {
                s.blog_rate = rate;
            }
        })
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(updated))
}
