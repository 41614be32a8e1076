//! # Payout Aggregator
//!
//! Pure per-author payout computation over the merged article feed:
//! group by author, count news and blog items separately, multiply by the
//! configured per-type rates. No I/O, no validation of the rates (zero or
//! negative rates are the caller's business).

use serde::Serialize;
use std::collections::HashMap;

use crate::ingest::types::{Article, ArticleType};

/// Per-author counts and total, in the wire shape the dashboard renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorPayoutStat {
    pub name: String,
    #[serde(rename = "newsCount")]
    pub news_count: u32,
    #[serde(rename = "blogCount")]
    pub blog_count: u32,
    #[serde(rename = "totalPayout")]
    pub total_payout: f64,
}

/// Feed-wide totals (the dashboard's overview cards and totals row).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayoutSummary {
    #[serde(rename = "totalNews")]
    pub total_news: u32,
    #[serde(rename = "totalBlogs")]
    pub total_blogs: u32,
    #[serde(rename = "totalPayout")]
    pub total_payout: f64,
}

/// Group articles by author and price the counts.
///
/// Authors appear in first-seen order. Grouping uses the author string
/// exactly as normalized by the providers (no case folding, no trimming);
/// a missing author groups under "Unknown". An author with no articles of
/// one type still carries that count at 0.
pub fn compute_payouts(articles: &[Article], news_rate: f64, blog_rate: f64) -> Vec<AuthorPayoutStat> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut stats: Vec<AuthorPayoutStat> = Vec::new();

    for a in articles {
        let author = a.author_name();
        let i = match index.get(author) {
            Some(&i) => i,
            None => {
                stats.push(AuthorPayoutStat {
                    name: author.to_string(),
                    news_count: 0,
                    blog_count: 0,
                    total_payout: 0.0,
                });
                index.insert(author, stats.len() - 1);
                stats.len() - 1
            }
        };
        match a.kind {
            ArticleType::News => stats[i].news_count += 1,
            ArticleType::Blog => stats[i].blog_count += 1,
        }
    }

    for s in &mut stats {
        s.total_payout = f64::from(s.news_count) * news_rate + f64::from(s.blog_count) * blog_rate;
    }
    stats
}

/// Sum the per-author stats into feed-wide totals.
pub fn summarize(stats: &[AuthorPayoutStat]) -> PayoutSummary {
    PayoutSummary {
        total_news: stats.iter().map(|s| s.news_count).sum(),
        total_blogs: stats.iter().map(|s| s.blog_count).sum(),
        total_payout: stats.iter().map(|s| s.total_payout).sum(),
    }
}
