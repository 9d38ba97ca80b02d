//! ApeWatch Core — trending-ticker acquisition and normalization.
//!
//! This crate contains the whole data pipeline behind the dashboard:
//! - Ranking page scrape with an isolated HTML adapter (ApeWisdom)
//! - Intraday price series per ticker (Yahoo Finance chart API)
//! - Record builder with a Valid/Error split
//! - Single-generation ticker store with stable sorted views
//! - Color and text formatting shared by the front ends
//! - `Dashboard`, the refresh facade front ends drive

pub mod config;
pub mod dashboard;
pub mod data;
pub mod domain;
pub mod format;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use dashboard::{apply_batch, collect_records, Dashboard, RefreshStatus};
pub use data::DataError;
pub use domain::{ErrorRecord, Mentions, PricePoint, PriceSeries, RankingEntry, TickerRecord, ValidRecord};
pub use format::{color_for_percentage, format_percentage, format_time_since, Rgb};
pub use store::{SortField, SortState, TickerStore};
