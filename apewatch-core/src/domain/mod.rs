//! Domain types for ApeWatch

pub mod entry;
pub mod record;
pub mod series;

pub use entry::{Mentions, RankingEntry};
pub use record::{build, price_change, ErrorRecord, TickerRecord, ValidRecord};
pub use series::{PricePoint, PriceSeries};
