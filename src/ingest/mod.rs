// src/ingest/mod.rs
pub mod providers;
pub mod types;

use std::sync::Arc;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;

use crate::ingest::types::{Article, ContentProvider};

/// One-time metrics registration (so series show up on /metrics).
pub fn describe_metrics() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "aggregate_requests_total",
            "Aggregation calls admitted past the rate limiter."
        );
        describe_counter!(
            "aggregate_rate_limited_total",
            "Aggregation calls rejected by the rate limiter."
        );
        describe_counter!(
            "provider_errors_total",
            "Upstream fetch failures (transport or non-success status)."
        );
        describe_counter!(
            "articles_merged_total",
            "Articles returned across all providers."
        );
        describe_histogram!(
            "aggregate_fetch_ms",
            "Wall time of the parallel fetch and merge in milliseconds."
        );
    });
}

/// Failure of one aggregation call.
#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    /// A provider failed (transport or status); carries the
    /// source-attributable message.
    #[error("{0}")]
    Upstream(String),
    /// Anything else (task join failure and the like).
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// Fetch every provider concurrently, normalize, and merge.
///
/// Batches are concatenated in provider order, each keeping its upstream
/// ordering; no cross-source sort or dedup. Partial success is not
/// tolerated: any provider failure fails the whole call. A fetch that is
/// already in flight when another provider fails runs to completion on its
/// own task; there is no cancellation and no per-request timeout.
pub async fn aggregate(
    client: &reqwest::Client,
    providers: &[Arc<dyn ContentProvider>],
) -> Result<Vec<Article>, AggregateError> {
    describe_metrics();
    counter!("aggregate_requests_total").increment(1);
    let t0 = std::time::Instant::now();

    let mut handles = Vec::with_capacity(providers.len());
    for p in providers {
        let name = p.name();
        let p = Arc::clone(p);
        let client = client.clone();
        let handle = tokio::spawn(async move {
            let raw = p.fetch(&client).await?;
            Ok::<_, anyhow::Error>(p.normalize(raw))
        });
        handles.push((name, handle));
    }

    let mut articles = Vec::new();
    for (name, handle) in handles {
        match handle.await {
            Ok(Ok(mut batch)) => articles.append(&mut batch),
            Ok(Err(e)) => {
                tracing::warn!(provider = name, error = %e, "provider failed, aggregation aborted");
                return Err(AggregateError::Upstream(e.to_string()));
            }
            Err(e) => return Err(AggregateError::Unexpected(anyhow::Error::new(e))),
        }
    }

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("aggregate_fetch_ms").record(ms);
    counter!("articles_merged_total").increment(articles.len() as u64);

    tracing::debug!(count = articles.len(), "aggregation merged");
    Ok(articles)
}
