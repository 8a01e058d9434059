//! Configuration Management
//!
//! Handles persistent configuration storage for cloudres.

use crate::api::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::resource::{Category, DEFAULT_PAGE_SIZE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding the configured base URL
pub const BASE_URL_ENV: &str = "CLOUDRES_BASE_URL";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Resource API base URL
    #[serde(default)]
    pub base_url: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Records per page
    #[serde(default)]
    pub page_size: Option<u32>,
    /// Last listed category
    #[serde(default)]
    pub last_category: Option<Category>,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cloudres").join("config.json"))
    }

    /// Load configuration from disk, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid config {:?}: {}", path, e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read config {:?}: {}", path, e);
                Self::default()
            },
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Get effective base URL (CLI > environment > config > default)
    pub fn effective_base_url(&self, cli: Option<&str>) -> String {
        let env = std::env::var(BASE_URL_ENV).ok().filter(|v| !v.is_empty());
        resolve_base_url(cli, env.as_deref(), self.base_url.as_deref())
    }

    /// Get effective timeout (CLI > config > default)
    pub fn effective_timeout(&self, cli_secs: Option<u64>) -> Duration {
        cli_secs
            .or(self.timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Get effective page size (CLI > config > default)
    pub fn effective_page_size(&self, cli: Option<u32>) -> u32 {
        cli.or(self.page_size).unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Get effective category (CLI > last used > default)
    pub fn effective_category(&self, cli: Option<Category>) -> Category {
        cli.or(self.last_category).unwrap_or_default()
    }

    /// Remember the last listed category and save
    pub fn set_last_category(&mut self, category: Category) -> Result<()> {
        if self.last_category == Some(category) {
            return Ok(());
        }
        self.last_category = Some(category);
        self.save()
    }
}

fn resolve_base_url(cli: Option<&str>, env: Option<&str>, config: Option<&str>) -> String {
    cli.or(env)
        .or(config)
        .unwrap_or(DEFAULT_BASE_URL)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.effective_timeout(None), Duration::from_secs(5));
        assert_eq!(config.effective_page_size(None), 10);
        assert_eq!(config.effective_category(None), Category::Ecs);
    }

    #[test]
    fn test_cli_overrides_config() {
        let config = Config {
            base_url: Some("http://inventory:8080".to_string()),
            timeout_secs: Some(30),
            page_size: Some(50),
            last_category: Some(Category::Rds),
        };

        assert_eq!(config.effective_timeout(Some(2)), Duration::from_secs(2));
        assert_eq!(config.effective_timeout(None), Duration::from_secs(30));
        assert_eq!(config.effective_page_size(Some(20)), 20);
        assert_eq!(config.effective_category(None), Category::Rds);
        assert_eq!(config.effective_category(Some(Category::Slb)), Category::Slb);
    }

    #[test]
    fn test_base_url_precedence() {
        assert_eq!(
            resolve_base_url(Some("http://cli"), Some("http://env"), Some("http://cfg")),
            "http://cli"
        );
        assert_eq!(
            resolve_base_url(None, Some("http://env"), Some("http://cfg")),
            "http://env"
        );
        assert_eq!(resolve_base_url(None, None, Some("http://cfg")), "http://cfg");
        assert_eq!(resolve_base_url(None, None, None), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_config_round_trips_category_names() {
        let config: Config = serde_json::from_str(r#"{"last_category": "polardb"}"#).unwrap();
        assert_eq!(config.last_category, Some(Category::Polardb));
    }
}
