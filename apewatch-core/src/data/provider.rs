//! Source traits and structured error types.
//!
//! `RankingSource` and `PriceSource` abstract over the two external feeds so the
//! dashboard can be driven by mocks in tests and the HTTP adapters can be
//! swapped without touching callers.

use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;
use tracing::warn;

use crate::domain::{PriceSeries, RankingEntry};

/// Structured error types for fetch operations.
///
/// Displayable in both CLI and TUI status lines.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("page structure changed: {0}")]
    ParseDrift(String),

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("price provider blocked requests (circuit breaker open)")]
    CircuitBreakerOpen,

    #[error("HTTP client error: {0}")]
    Client(String),
}

impl DataError {
    pub(crate) fn from_request(err: reqwest::Error, url: &str) -> Self {
        if let Some(status) = err.status() {
            return DataError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            };
        }
        DataError::NetworkUnreachable(err.to_string())
    }
}

/// Blocking client shared by both HTTP sources.
pub(crate) fn build_client(timeout_secs: u64, user_agent: &str) -> Result<Client, DataError> {
    let builder = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(user_agent);
    // Local stub servers must not be routed through an environment proxy.
    #[cfg(test)]
    let builder = builder.no_proxy();
    builder.build().map_err(|e| DataError::Client(e.to_string()))
}

/// Source of the trending-ticker ranking.
///
/// Any error means the whole ranking is unusable; partial parses are not returned.
pub trait RankingSource: Send {
    fn name(&self) -> &str;

    fn fetch_ranking(&self) -> Result<Vec<RankingEntry>, DataError>;
}

/// Source of recent intraday prices for one symbol.
pub trait PriceSource: Send {
    fn name(&self) -> &str;

    /// Fetch the series for an already-normalized symbol.
    ///
    /// `Ok(None)` means the provider answered with zero rows.
    fn fetch_series(&self, symbol: &str) -> Result<Option<PriceSeries>, DataError>;

    /// Fetch prices for a ranking ticker, absorbing every failure into `None`.
    fn fetch_prices(&self, ticker: &str) -> Option<PriceSeries> {
        let symbol = normalize_symbol(ticker);
        if symbol.is_empty() {
            warn!(ticker, "empty symbol after normalization");
            return None;
        }
        match self.fetch_series(&symbol) {
            Ok(Some(series)) => Some(series),
            Ok(None) => {
                warn!(source = self.name(), %symbol, "provider returned no rows");
                None
            }
            Err(e) => {
                warn!(source = self.name(), %symbol, error = %e, "price fetch failed");
                None
            }
        }
    }
}

/// Strip cashtag markers and whitespace: `"$GME "` → `"GME"`.
pub fn normalize_symbol(ticker: &str) -> String {
    ticker.trim().replace('$', "")
}
