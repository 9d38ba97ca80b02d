//! External feeds: ranking page scrape and price series fetch.

pub mod circuit_breaker;
pub mod provider;
pub mod ranking;
pub mod yahoo;

#[cfg(test)]
pub(crate) mod test_server;

pub use circuit_breaker::{BreakerState, CircuitBreaker};
pub use provider::{normalize_symbol, DataError, PriceSource, RankingSource};
pub use ranking::{ApeWisdomParser, HttpRankingSource, RankingPageParser};
pub use yahoo::YahooPriceSource;
