// src/ingest/providers/newsapi.rs
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use crate::ingest::providers::{fetch_json, now_rfc3339};
use crate::ingest::types::{Article, ArticleSource, ArticleType, ContentProvider, RawPayload};

const NEWSAPI_URL: &str =
    "https://newsapi.org/v2/everything?q=technology&language=en&pageSize=10&sortBy=publishedAt";

#[derive(Debug, Default, Deserialize)]
struct NewsApiPayload {
    #[serde(default)]
    articles: Vec<NewsApiItem>,
}

#[derive(Debug, Deserialize)]
struct NewsApiItem {
    title: Option<String>,
    author: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    source: Option<NewsApiItemSource>,
}

#[derive(Debug, Deserialize)]
struct NewsApiItemSource {
    name: Option<String>,
}

/// NewsAPI.org "everything" endpoint, the `news` half of the feed.
pub struct NewsApiProvider {
    url: String,
}

impl NewsApiProvider {
    pub fn new(api_key: &str) -> Self {
        Self {
            url: format!("{NEWSAPI_URL}&apiKey={api_key}"),
        }
    }
}

#[async_trait]
impl ContentProvider for NewsApiProvider {
    fn name(&self) -> &'static str {
        "NewsAPI"
    }

    fn kind(&self) -> ArticleType {
        ArticleType::News
    }

    async fn fetch(&self, client: &reqwest::Client) -> Result<RawPayload> {
        fetch_json(client, &self.url, ArticleType::News).await
    }

    fn normalize(&self, raw: RawPayload) -> Vec<Article> {
        // A payload that doesn't match the expected envelope yields an
        // empty batch rather than an error.
        let payload: NewsApiPayload = serde_json::from_value(raw).unwrap_or_default();
        payload
            .articles
            .into_iter()
            .map(|it| Article {
                title: it.title.unwrap_or_else(|| "Untitled".to_string()),
                author: Some(it.author.unwrap_or_else(|| "Unknown".to_string())),
                published_at: it.published_at.unwrap_or_else(now_rfc3339),
                source: ArticleSource {
                    name: it
                        .source
                        .and_then(|s| s.name)
                        .unwrap_or_else(|| "Unknown".to_string()),
                },
                kind: ArticleType::News,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider() -> NewsApiProvider {
        NewsApiProvider::new("test-key")
    }

    #[test]
    fn normalizes_full_items() {
        let raw = json!({
            "status": "ok",
            "articles": [{
                "title": "Rust 2.0 announced",
                "author": "Alex",
                "publishedAt": "2026-08-01T10:00:00Z",
                "source": { "id": "tc", "name": "TechCrunch" },
                "url": "https://example.com/a"
            }]
        });
        let out = provider().normalize(raw);
        assert_eq!(out.len(), 1);
        let a = &out[0];
        assert_eq!(a.title, "Rust 2.0 announced");
        assert_eq!(a.author.as_deref(), Some("Alex"));
        assert_eq!(a.published_at, "2026-08-01T10:00:00Z");
        assert_eq!(a.source.name, "TechCrunch");
        assert_eq!(a.kind, ArticleType::News);
    }

    #[test]
    fn fills_defaults_for_missing_fields() {
        let raw = json!({ "articles": [{ "url": "https://example.com/b" }] });
        let out = provider().normalize(raw);
        assert_eq!(out.len(), 1);
        let a = &out[0];
        assert_eq!(a.title, "Untitled");
        assert_eq!(a.author.as_deref(), Some("Unknown"));
        assert!(!a.published_at.is_empty());
        assert_eq!(a.source.name, "Unknown");
    }

    #[test]
    fn null_fields_count_as_missing() {
        let raw = json!({
            "articles": [{ "title": null, "author": null, "publishedAt": null, "source": null }]
        });
        let a = &provider().normalize(raw)[0];
        assert_eq!(a.title, "Untitled");
        assert_eq!(a.author.as_deref(), Some("Unknown"));
        assert_eq!(a.source.name, "Unknown");
    }

    #[test]
    fn malformed_payload_yields_empty_batch() {
        assert!(provider().normalize(json!("nope")).is_empty());
        assert!(provider().normalize(json!({ "articles": "nope" })).is_empty());
        assert!(provider().normalize(json!({})).is_empty());
    }
}
