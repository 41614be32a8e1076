// src/ingest/providers/devto.rs
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use crate::ingest::providers::{fetch_json, now_rfc3339};
use crate::ingest::types::{Article, ArticleSource, ArticleType, ContentProvider, RawPayload};

const DEVTO_URL: &str = "https://dev.to/api/articles?per_page=10";

// dev.to returns a bare array, not an envelope.
#[derive(Debug, Deserialize)]
struct DevtoItem {
    title: Option<String>,
    user: Option<DevtoUser>,
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DevtoUser {
    name: Option<String>,
}

/// dev.to articles endpoint, the `blog` half of the feed.
pub struct DevtoProvider {
    url: String,
}

impl DevtoProvider {
    pub fn new() -> Self {
        Self {
            url: DEVTO_URL.to_string(),
        }
    }
}

impl Default for DevtoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentProvider for DevtoProvider {
    fn name(&self) -> &'static str {
        "dev.to"
    }

    fn kind(&self) -> ArticleType {
        ArticleType::Blog
    }

    async fn fetch(&self, client: &reqwest::Client) -> Result<RawPayload> {
        fetch_json(client, &self.url, ArticleType::Blog).await
    }

    fn normalize(&self, raw: RawPayload) -> Vec<Article> {
        let items: Vec<DevtoItem> = serde_json::from_value(raw).unwrap_or_default();
        items
            .into_iter()
            .map(|it| Article {
                title: it.title.unwrap_or_else(|| "Untitled".to_string()),
                author: Some(
                    it.user
                        .and_then(|u| u.name)
                        .unwrap_or_else(|| "Unknown".to_string()),
                ),
                published_at: it.published_at.unwrap_or_else(now_rfc3339),
                source: ArticleSource {
                    name: "dev.to".to_string(),
                },
                kind: ArticleType::Blog,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_bare_array() {
        let raw = json!([
            {
                "title": "Why I rewrote it",
                "user": { "name": "Sam" },
                "published_at": "2026-08-02T08:30:00Z",
                "tag_list": ["rust"]
            },
            { "title": "Untagged draft" }
        ]);
        let out = DevtoProvider::new().normalize(raw);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].author.as_deref(), Some("Sam"));
        assert_eq!(out[0].source.name, "dev.to");
        assert_eq!(out[0].kind, ArticleType::Blog);
        assert_eq!(out[1].author.as_deref(), Some("Unknown"));
        assert!(!out[1].published_at.is_empty());
    }

    #[test]
    fn missing_user_name_defaults_to_unknown() {
        let raw = json!([{ "title": "t", "user": {} }]);
        let out = DevtoProvider::new().normalize(raw);
        assert_eq!(out[0].author.as_deref(), Some("Unknown"));
    }

    #[test]
    fn non_array_payload_yields_empty_batch() {
        let out = DevtoProvider::new().normalize(json!({ "error": "rate limited" }));
        assert!(out.is_empty());
    }
}
