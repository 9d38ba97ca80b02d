//! RankingEntry — one row of the trending-ticker page.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mention count as shown on the ranking page.
///
/// The raw cell text is kept for display (`"1,234"`); `count()` is the numeric
/// view used for sorting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mentions(String);

impl Mentions {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Numeric value with thousands separators stripped.
    ///
    /// Returns `None` when the text is not a number (or is NaN).
    pub fn count(&self) -> Option<f64> {
        let cleaned: String = self.0.chars().filter(|c| *c != ',').collect();
        cleaned
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| !v.is_nan())
    }
}

impl fmt::Display for Mentions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Mentions {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Mentions {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// A trending ticker with its mention count and sentiment delta (percent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub ticker: String,
    pub mentions: Mentions,
    pub sentiment_change: f64,
}

impl RankingEntry {
    pub fn new(ticker: impl Into<String>, mentions: impl Into<Mentions>, sentiment_change: f64) -> Self {
        Self {
            ticker: ticker.into(),
            mentions: mentions.into(),
            sentiment_change,
        }
    }
}
