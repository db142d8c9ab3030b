//! src/config.rs
//! ============================================================================
//! # Config: client configuration loader and saver
//!
//! Settings live as TOML in the platform config directory resolved with
//! [`directories`](https://docs.rs/directories). A missing file is created
//! with defaults on first run. `SHELF_API_URL` overrides the backend URL.
//!
//! ## Example
//! ```rust,ignore
//! let config = Config::load().await?;
//! config.save().await?;
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tokio::fs as TokioFs;
use tracing::{info, warn};

use crate::logging::LoggerConfig;
use crate::model::query::{DEFAULT_LIMIT, MovieQuery, SortField, SortOrder};
use crate::util::debounce::DebounceConfig;

pub const API_URL_ENV: &str = "SHELF_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "shelf";
const APPLICATION: &str = "Shelf";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the REST backend, without trailing slash.
    pub api_url: String,

    /// Movies per page.
    pub page_size: u32,

    pub default_sort: SortField,

    pub default_order: SortOrder,

    /// Quiet time before search input triggers a request.
    #[serde(with = "humantime_serde")]
    pub search_debounce: Duration,

    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// How long success and info toasts stay up.
    #[serde(with = "humantime_serde")]
    pub notification_timeout: Duration,

    /// Where the session token is kept. Defaults to `<data dir>/token`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_file: Option<PathBuf>,

    pub logging: LoggerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            page_size: DEFAULT_LIMIT,
            default_sort: SortField::Title,
            default_order: SortOrder::Asc,
            search_debounce: Duration::from_millis(400),
            request_timeout: Duration::from_secs(15),
            notification_timeout: Duration::from_secs(3),
            token_file: None,
            logging: LoggerConfig::default(),
        }
    }
}

impl Config {
    /// Load from the platform config path, creating it when absent.
    pub async fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;
        let mut config = if TokioFs::try_exists(&path).await.unwrap_or(false) {
            Self::load_from(&path).await?
        } else {
            info!(
                "No config file found at {}, creating one with defaults",
                path.display()
            );
            let config = Self::default();
            config.save_to(&path).await?;
            config
        };
        config.apply_overrides(std::env::var(API_URL_ENV).ok());
        Ok(config)
    }

    pub async fn load_from(path: &Path) -> anyhow::Result<Self> {
        info!("Loading config from {}", path.display());
        let text = TokioFs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut config: Self = toml::from_str(&text)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.sanitize();
        Ok(config)
    }

    pub async fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path()?).await
    }

    pub async fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        info!("Saving config to {}", path.display());
        if let Some(parent) = path.parent() {
            TokioFs::create_dir_all(parent).await?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        TokioFs::write(path, toml_str).await?;
        Ok(())
    }

    /// Replace values that would break paging or requests.
    fn sanitize(&mut self) {
        if self.page_size == 0 {
            warn!("page_size = 0 is invalid; using {}", DEFAULT_LIMIT);
            self.page_size = DEFAULT_LIMIT;
        }
        let trimmed = self.api_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            warn!("api_url is empty; using {}", DEFAULT_API_URL);
            self.api_url = DEFAULT_API_URL.to_owned();
        } else if trimmed.len() != self.api_url.len() {
            self.api_url = trimmed.to_owned();
        }
    }

    /// Apply the environment override for the backend URL, if non-blank.
    pub fn apply_overrides(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            info!("Using API URL from {}", API_URL_ENV);
            self.api_url = url;
            self.sanitize();
        }
    }

    /// The query the movie list starts with.
    pub fn initial_query(&self) -> MovieQuery {
        let mut query = MovieQuery::with_limit(self.page_size).unwrap_or_default();
        query.sort = self.default_sort;
        query.order = self.default_order;
        query
    }

    pub const fn debounce(&self) -> DebounceConfig {
        DebounceConfig::with_delay(self.search_debounce)
    }

    pub fn token_path(&self) -> anyhow::Result<PathBuf> {
        match &self.token_file {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_local_dir().join("token")),
        }
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(project_dirs()?.config_dir().to_path_buf())
    }
}

fn project_dirs() -> anyhow::Result<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .ok_or_else(|| anyhow!("Could not determine config directory."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            page_size: 20,
            default_sort: SortField::Year,
            search_debounce: Duration::from_millis(250),
            ..Config::default()
        };
        config.save_to(&path).await.unwrap();

        let loaded = Config::load_from(&path).await.unwrap();
        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn zero_page_size_and_trailing_slash_are_fixed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        TokioFs::write(
            &path,
            "api_url = \"https://movies.example/api/v1/\"\npage_size = 0\nsearch_debounce = \"1s\"\n",
        )
        .await
        .unwrap();

        let loaded = Config::load_from(&path).await.unwrap();
        assert_eq!(loaded.page_size, DEFAULT_LIMIT);
        assert_eq!(loaded.api_url, "https://movies.example/api/v1");
        assert_eq!(loaded.search_debounce, Duration::from_secs(1));
        assert_eq!(loaded.request_timeout, Duration::from_secs(15));
    }

    #[test]
    fn env_override_replaces_url() {
        let mut config = Config::default();
        config.apply_overrides(Some("  ".into()));
        assert_eq!(config.api_url, DEFAULT_API_URL);
        config.apply_overrides(Some("http://10.0.0.2:8000/api/v1/".into()));
        assert_eq!(config.api_url, "http://10.0.0.2:8000/api/v1");
    }

    #[test]
    fn initial_query_uses_configured_defaults() {
        let config = Config {
            page_size: 10,
            default_order: SortOrder::Desc,
            ..Config::default()
        };
        let query = config.initial_query();
        assert_eq!(query.limit, 10);
        assert_eq!(query.order, SortOrder::Desc);
        assert_eq!(query.offset, 0);
    }
}
