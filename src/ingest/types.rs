// src/ingest/types.rs
use anyhow::Result;

/// Raw upstream payload as parsed JSON; each provider knows its own shape.
pub type RawPayload = serde_json::Value;

/// Tag distinguishing the two content kinds the dashboard merges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleType {
    News,
    Blog,
}

impl ArticleType {
    /// Message used when the upstream transport fails outright.
    pub fn fetch_failed_message(self) -> &'static str {
        match self {
            ArticleType::News => "News API fetch failed",
            ArticleType::Blog => "Blog API fetch failed",
        }
    }

    /// Message used when the upstream responds with a non-success status.
    pub fn bad_status_message(self) -> &'static str {
        match self {
            ArticleType::News => "Failed to fetch news",
            ArticleType::Blog => "Failed to fetch blogs",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ArticleSource {
    pub name: String,
}

/// Normalized article shared by both providers. `title` and `publishedAt`
/// always carry a fallback; `author` may be absent upstream and is grouped
/// as "Unknown" wherever it is consumed.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Article {
    pub title: String,
    pub author: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: String,
    pub source: ArticleSource,
    #[serde(rename = "type")]
    pub kind: ArticleType,
}

impl Article {
    /// Author name used for display and payout grouping.
    pub fn author_name(&self) -> &str {
        self.author.as_deref().unwrap_or("Unknown")
    }
}

/// One upstream content source. `fetch` owns transport and status handling;
/// `normalize` is a pure payload-to-articles mapping so it can be tested on
/// fixtures. Adding a provider means one new implementation, no change to
/// the merge logic.
#[async_trait::async_trait]
pub trait ContentProvider: Send + Sync {
    fn name(&self) -> &'static str;
    fn kind(&self) -> ArticleType;
    async fn fetch(&self, client: &reqwest::Client) -> Result<RawPayload>;
    fn normalize(&self, raw: RawPayload) -> Vec<Article>;
}
