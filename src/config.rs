// src/config.rs
//
// Process-wide configuration, loaded once at startup and injected into
// every consumer (router state, providers, admin predicate). Lookup order:
// optional TOML file, then environment overrides, then built-in defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const ENV_CONFIG_PATH: &str = "NEWSBOARD_CONFIG_PATH";
const ENV_NEWS_API_KEY: &str = "NEWS_API_KEY";
const ENV_ADMIN_EMAILS: &str = "ADMIN_EMAILS";
const DEFAULT_CONFIG_PATH: &str = "config/newsboard.toml";

/// Fixed-window limiter defaults: 10 requests per 60s.
pub const DEFAULT_MAX_REQUESTS_PER_WINDOW: u32 = 10;
pub const DEFAULT_RATE_WINDOW_MS: u64 = 60_000;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// NewsAPI key; empty means the news provider will get 401s upstream,
    /// which surface as a fetch failure, not a crash.
    pub news_api_key: String,
    /// Admin allow-list consulted by the payout route. One copy per
    /// process.
    pub admins: Vec<String>,
    pub max_requests_per_window: u32,
    pub rate_window_ms: u64,
    /// Where the dashboard settings record lives.
    pub settings_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            news_api_key: String::new(),
            admins: vec![
                "yadavpriyanka97181019@gmail.com".to_string(),
                "admin@example.com".to_string(),
            ],
            max_requests_per_window: DEFAULT_MAX_REQUESTS_PER_WINDOW,
            rate_window_ms: DEFAULT_RATE_WINDOW_MS,
            settings_path: PathBuf::from("config/settings.json"),
        }
    }
}

impl AppConfig {
    /// Load using env var + fallbacks:
    /// 1) $NEWSBOARD_CONFIG_PATH
    /// 2) config/newsboard.toml
    /// 3) built-in defaults
    /// Environment overrides (NEWS_API_KEY, ADMIN_EMAILS) apply on top.
    pub fn load() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            Self::load_from(Path::new(&p))?
        } else {
            let default = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default.exists() {
                Self::load_from(&default)?
            } else {
                Self::default()
            }
        };
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    /// Load from an explicit TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(ENV_NEWS_API_KEY) {
            self.news_api_key = key;
        }
        if let Ok(emails) = std::env::var(ENV_ADMIN_EMAILS) {
            let list: Vec<String> = emails
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if !list.is_empty() {
                self.admins = list;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn toml_file_overrides_defaults_and_fills_gaps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("newsboard.toml");
        fs::write(
            &path,
            r#"
                admins = ["ops@example.com"]
                max_requests_per_window = 3
            "#,
        )
        .unwrap();

        let cfg = AppConfig::load_from(&path).unwrap();
        assert_eq!(cfg.admins, vec!["ops@example.com".to_string()]);
        assert_eq!(cfg.max_requests_per_window, 3);
        // Unset fields keep their defaults.
        assert_eq!(cfg.rate_window_ms, DEFAULT_RATE_WINDOW_MS);
        assert!(cfg.news_api_key.is_empty());
    }

    #[test]
    fn bad_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("newsboard.toml");
        fs::write(&path, "admins = 5").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }

    #[serial_test::serial]
    #[test]
    fn env_overrides_apply_on_top() {
        env::remove_var(ENV_CONFIG_PATH);
        env::set_var(ENV_NEWS_API_KEY, "k-123");
        env::set_var(ENV_ADMIN_EMAILS, "a@x.dev, b@x.dev ,");

        let cfg = AppConfig::load().unwrap();
        assert_eq!(cfg.news_api_key, "k-123");
        assert_eq!(cfg.admins, vec!["a@x.dev".to_string(), "b@x.dev".to_string()]);

        env::remove_var(ENV_NEWS_API_KEY);
        env::remove_var(ENV_ADMIN_EMAILS);
    }

    #[serial_test::serial]
    #[test]
    fn defaults_without_file_or_env() {
        env::remove_var(ENV_CONFIG_PATH);
        env::remove_var(ENV_NEWS_API_KEY);
        env::remove_var(ENV_ADMIN_EMAILS);

        // Repo root has no config/newsboard.toml checked in; load() lands
        // on defaults.
        let cfg = AppConfig::load().unwrap();
        assert_eq!(cfg.max_requests_per_window, 10);
        assert_eq!(cfg.rate_window_ms, 60_000);
        assert_eq!(cfg.admins.len(), 2);
    }
}
