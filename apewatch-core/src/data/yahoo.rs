//! Yahoo Finance intraday price source.
//!
//! Fetches recent closes from Yahoo's v8 chart API (`range=5d&interval=15m`
//! by default). Yahoo has no official API and changes format without notice,
//! so every shape mismatch is reported as `ResponseFormatChanged` and ends up
//! as a missing series for that one ticker.

use std::sync::Arc;
use std::time::Duration;

use chrono::DateTime;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use super::circuit_breaker::CircuitBreaker;
use super::provider::{build_client, DataError, PriceSource};
use crate::config::PriceConfig;
use crate::domain::{PricePoint, PriceSeries};

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

pub struct YahooPriceSource {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    base_url: Url,
    range: String,
    interval: String,
}

impl YahooPriceSource {
    pub fn new(config: &PriceConfig) -> Result<Self, DataError> {
        let breaker = CircuitBreaker::new(
            Duration::from_secs(config.breaker_cooldown_secs),
            config.breaker_threshold,
        );
        Self::with_breaker(config, Arc::new(breaker))
    }

    pub fn with_breaker(
        config: &PriceConfig,
        circuit_breaker: Arc<CircuitBreaker>,
    ) -> Result<Self, DataError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| DataError::Client(format!("bad base_url `{}`: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(DataError::Client(format!(
                "bad base_url `{}`: not a base URL",
                config.base_url
            )));
        }

        Ok(Self {
            client: build_client(config.timeout_secs, &config.user_agent)?,
            circuit_breaker,
            base_url,
            range: config.range.clone(),
            interval: config.interval.clone(),
        })
    }

    /// The symbol is one encoded path segment, so `/` or `?` in it stay literal.
    fn chart_url(&self, symbol: &str) -> String {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v8", "finance", "chart", symbol]);
        }
        url.query_pairs_mut()
            .append_pair("range", &self.range)
            .append_pair("interval", &self.interval);
        url.into()
    }

    fn request(&self, symbol: &str) -> Result<Option<PriceSeries>, DataError> {
        let url = self.chart_url(symbol);
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::from_request(e, &url))?;

        let status = resp.status();
        if status == StatusCode::FORBIDDEN {
            self.circuit_breaker.trip();
            return Err(DataError::CircuitBreakerOpen);
        }
        // Yahoo answers unknown symbols with 404 and a chart.error body.
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(DataError::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = resp
            .text()
            .map_err(|e| DataError::NetworkUnreachable(format!("read body: {e}")))?;
        Self::parse_chart(symbol, &body)
    }

    /// Parse a raw chart API body. `Ok(None)` for zero usable rows.
    pub fn parse_chart(symbol: &str, body: &str) -> Result<Option<PriceSeries>, DataError> {
        let chart: ChartResponse = serde_json::from_str(body).map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;
        Self::parse_response(symbol, chart)
    }

    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Option<PriceSeries>, DataError> {
        let result = match (resp.chart.result, resp.chart.error) {
            (Some(result), _) => result,
            (None, Some(err)) if err.code == "Not Found" => {
                return Err(DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                });
            }
            (None, Some(err)) => {
                return Err(DataError::ResponseFormatChanged(format!(
                    "{}: {}",
                    err.code, err.description
                )));
            }
            (None, None) => {
                return Err(DataError::ResponseFormatChanged(
                    "empty result with no error".into(),
                ));
            }
        };

        let Some(data) = result.into_iter().next() else {
            return Ok(None);
        };
        // Yahoo omits `timestamp` entirely when the range has no trades.
        let Some(timestamps) = data.timestamp else {
            return Ok(None);
        };
        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let mut points = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let Some(close) = quote.close.get(i).copied().flatten() else {
                continue;
            };
            let timestamp = DateTime::from_timestamp(ts, 0).ok_or_else(|| {
                DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
            })?;
            points.push(PricePoint::new(timestamp, close));
        }

        debug!(%symbol, rows = timestamps.len(), kept = points.len(), "parsed chart");
        Ok(PriceSeries::new(points))
    }
}

impl PriceSource for YahooPriceSource {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch_series(&self, symbol: &str) -> Result<Option<PriceSeries>, DataError> {
        if !self.circuit_breaker.is_allowed() {
            return Err(DataError::CircuitBreakerOpen);
        }

        let result = self.request(symbol);
        match &result {
            // An unknown symbol is a healthy answer from the provider.
            Ok(_) | Err(DataError::SymbolNotFound { .. }) => self.circuit_breaker.record_success(),
            Err(DataError::CircuitBreakerOpen) => {}
            Err(_) => self.circuit_breaker.record_failure(),
        }
        result
    }
}
