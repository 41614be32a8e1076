// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod auth;
pub mod config;
pub mod ingest;
pub mod limiter;
pub mod metrics;
pub mod payout;
pub mod settings;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::ingest::types::{Article, ArticleSource, ArticleType, ContentProvider};
