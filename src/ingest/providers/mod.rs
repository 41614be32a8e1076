// src/ingest/providers/mod.rs
pub mod devto;
pub mod newsapi;

pub use devto::DevtoProvider;
pub use newsapi::NewsApiProvider;

use anyhow::{bail, Context, Result};
use chrono::{SecondsFormat, Utc};
use metrics::counter;

use crate::ingest::types::{ArticleType, RawPayload};

/// GET `url` and parse the body as JSON.
///
/// A transport-level failure surfaces as the source-specific
/// "<X> API fetch failed" message; a non-success status logs the upstream
/// body for diagnosis and surfaces as "Failed to fetch <x>". The raw
/// transport error never reaches the caller.
pub(crate) async fn fetch_json(
    client: &reqwest::Client,
    url: &str,
    kind: ArticleType,
) -> Result<RawPayload> {
    let resp = match client.get(url).send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(error = ?e, kind = ?kind, "upstream transport error");
            counter!("provider_errors_total").increment(1);
            bail!(kind.fetch_failed_message());
        }
    };

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        tracing::error!(%status, kind = ?kind, body = %body, "upstream error response");
        counter!("provider_errors_total").increment(1);
        bail!(kind.bad_status_message());
    }

    resp.json::<RawPayload>()
        .await
        .context(kind.bad_status_message())
}

/// Current time in the wire format used for `publishedAt` fallbacks,
/// e.g. `2026-08-29T12:00:00.000Z`.
pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
