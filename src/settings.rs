//! # Dashboard Settings
//!
//! The handful of scalars the dashboard persists between visits (theme,
//! pay rates, last computed payout total), modeled as one typed record with
//! explicit defaults and a single load/save boundary. The record is written
//! wholesale on every change; there is no versioning or migration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::{fs, io};

/// Persisted settings record. Field names match the dashboard's storage
/// keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub theme: String,
    #[serde(rename = "newsRate")]
    pub news_rate: f64,
    #[serde(rename = "blogRate")]
    pub blog_rate: f64,
    #[serde(rename = "totalPayoutAmount")]
    pub total_payout_amount: f64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            news_rate: 10.0,
            blog_rate: 15.0,
            total_payout_amount: 0.0,
        }
    }
}

/// The one place settings are read from and written to disk.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    cached: Mutex<DashboardSettings>,
}

impl SettingsStore {
    /// Open a store backed by `path`. A missing or unparsable file falls
    /// back to defaults; nothing is written until the first update.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let settings = match fs::read_to_string(&path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
                tracing::warn!(error = ?e, path = %path.display(), "settings file unparsable, using defaults");
                DashboardSettings::default()
            }),
            Err(_) => DashboardSettings::default(),
        };
        Self {
            path,
            cached: Mutex::new(settings),
        }
    }

    /// Snapshot of the current settings.
    pub fn get(&self) -> DashboardSettings {
        self.cached.lock().expect("settings mutex poisoned").clone()
    }

    /// Apply `f` to the record and persist the whole record.
    pub fn update<F>(&self, f: F) -> io::Result<DashboardSettings>
    where
        F: FnOnce(&mut DashboardSettings),
    {
        let mut guard = self.cached.lock().expect("settings mutex poisoned");
        f(&mut guard);
        let snapshot = guard.clone();
        drop(guard);

        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let json = serde_json::to_string_pretty(&snapshot).map_err(io::Error::other)?;
        fs::write(&self.path, json)?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::open(dir.path().join("settings.json"));
        assert_eq!(store.get(), DashboardSettings::default());
        assert_eq!(store.get().news_rate, 10.0);
        assert_eq!(store.get().blog_rate, 15.0);
        assert_eq!(store.get().theme, "light");
    }

    #[test]
    fn defaults_when_file_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();
        let store = SettingsStore::open(&path);
        assert_eq!(store.get(), DashboardSettings::default());
    }

    #[test]
    fn update_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = SettingsStore::open(&path);
        let updated = store
            .update(|s| {
                s.news_rate = 25.0;
                s.theme = "dark".to_string();
            })
            .unwrap();
        assert_eq!(updated.news_rate, 25.0);

        // Fresh store sees the written record; untouched fields keep their
        // defaults.
        let reloaded = SettingsStore::open(&path).get();
        assert_eq!(reloaded.news_rate, 25.0);
        assert_eq!(reloaded.theme, "dark");
        assert_eq!(reloaded.blog_rate, 15.0);
    }

    #[test]
    fn partial_file_fills_missing_fields_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "blogRate": 2.5 }"#).unwrap();
        let s = SettingsStore::open(&path).get();
        assert_eq!(s.blog_rate, 2.5);
        assert_eq!(s.news_rate, 10.0);
        assert_eq!(s.theme, "light");
    }
}
