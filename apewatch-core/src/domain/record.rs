//! TickerRecord — a ranking entry joined with its price series.
//!
//! A record is either `Valid` (price change computed, series attached) or
//! `Error` (ticker and a reason). Presentation code has to match on the variant
//! before it can reach any price field.

use serde::{Deserialize, Serialize};

use super::entry::{Mentions, RankingEntry};
use super::series::PriceSeries;

/// A ticker with a usable price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidRecord {
    pub ticker: String,
    pub mentions: Mentions,
    pub sentiment_change: f64,
    /// `(last - first) / first * 100`
    pub price_change: f64,
    pub prices: PriceSeries,
}

/// A ticker whose price data could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub ticker: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TickerRecord {
    Valid(ValidRecord),
    Error(ErrorRecord),
}

impl TickerRecord {
    pub fn ticker(&self) -> &str {
        match self {
            TickerRecord::Valid(r) => &r.ticker,
            TickerRecord::Error(r) => &r.ticker,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, TickerRecord::Valid(_))
    }

    pub fn as_valid(&self) -> Option<&ValidRecord> {
        match self {
            TickerRecord::Valid(r) => Some(r),
            TickerRecord::Error(_) => None,
        }
    }
}

pub const REASON_NO_DATA: &str = "no price data";
pub const REASON_SHORT_HISTORY: &str = "insufficient price history";
pub const REASON_ZERO_BASE: &str = "first price is zero";
pub const REASON_NON_FINITE: &str = "price change is not finite";

/// Percent change from first to last price.
///
/// Undefined (returns the error reason) for fewer than two points, a zero
/// first price, or a non-finite result.
pub fn price_change(series: &PriceSeries) -> Result<f64, &'static str> {
    if series.len() < 2 {
        return Err(REASON_SHORT_HISTORY);
    }
    let first = series.first().price;
    let last = series.last().price;
    if first == 0.0 {
        return Err(REASON_ZERO_BASE);
    }
    let change = (last - first) / first * 100.0;
    if !change.is_finite() {
        return Err(REASON_NON_FINITE);
    }
    Ok(change)
}

/// Join a ranking entry with its (possibly absent) price series.
///
/// Pure: every fetch failure has already been folded into `series == None`.
pub fn build(entry: RankingEntry, series: Option<PriceSeries>) -> TickerRecord {
    let RankingEntry {
        ticker,
        mentions,
        sentiment_change,
    } = entry;

    let Some(prices) = series else {
        return TickerRecord::Error(ErrorRecord {
            ticker,
            reason: REASON_NO_DATA.into(),
        });
    };

    match price_change(&prices) {
        Ok(price_change) => TickerRecord::Valid(ValidRecord {
            ticker,
            mentions,
            sentiment_change,
            price_change,
            prices,
        }),
        Err(reason) => TickerRecord::Error(ErrorRecord {
            ticker,
            reason: reason.into(),
        }),
    }
}
