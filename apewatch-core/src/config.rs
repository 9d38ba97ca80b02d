//! TOML configuration.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working setup pointed at ApeWisdom and Yahoo Finance.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::SortField;

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ranking: RankingConfig,
    pub prices: PriceConfig,
    pub dashboard: DashboardConfig,
    pub logging: LoggingConfig,
}

/// Ranking page location and its structural markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Entries kept after parsing.
    pub top_n: usize,
    /// Number of 3-cell groups read from the page.
    pub cell_window: usize,
    pub cell_selector: String,
    pub sentiment_selector: String,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            url: "https://apewisdom.io/".into(),
            user_agent: BROWSER_USER_AGENT.into(),
            timeout_secs: 10,
            top_n: 10,
            cell_window: 10,
            cell_selector: "td.td-right".into(),
            sentiment_selector: "span.percentage-green, span.percentage-red".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Yahoo `range` parameter.
    pub range: String,
    /// Yahoo `interval` parameter.
    pub interval: String,
    pub timeout_secs: u64,
    pub breaker_cooldown_secs: u64,
    pub breaker_threshold: u32,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query2.finance.yahoo.com".into(),
            user_agent: BROWSER_USER_AGENT.into(),
            range: "5d".into(),
            interval: "15m".into(),
            timeout_secs: 10,
            breaker_cooldown_secs: 10 * 60,
            breaker_threshold: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Auto-refresh period for the TUI; 0 disables the timer.
    pub refresh_interval_secs: u64,
    pub show_errors: bool,
    pub sort: SortField,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 300,
            show_errors: false,
            sort: SortField::Mentions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Log file for the TUI (the terminal is taken by the dashboard).
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            file: None,
        }
    }
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ranking.url.trim().is_empty() {
            return Err(ConfigError::Invalid("ranking.url is empty".into()));
        }
        if self.ranking.top_n == 0 {
            return Err(ConfigError::Invalid("ranking.top_n must be at least 1".into()));
        }
        if self.ranking.cell_window == 0 {
            return Err(ConfigError::Invalid(
                "ranking.cell_window must be at least 1".into(),
            ));
        }
        if self.ranking.timeout_secs == 0 || self.prices.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeouts must be at least 1s".into()));
        }
        if self.prices.range.is_empty() || self.prices.interval.is_empty() {
            return Err(ConfigError::Invalid(
                "prices.range and prices.interval are required".into(),
            ));
        }
        Ok(())
    }
}
