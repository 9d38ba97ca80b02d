//! TickerStore — the current generation of records plus sorted views.
//!
//! Records are keyed by ticker and remember insertion (ranking) order. A
//! refresh replaces the whole generation; nothing from the previous cycle
//! survives.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::domain::TickerRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Mentions,
    PriceChange,
    SentimentChange,
}

impl SortField {
    pub const ALL: [SortField; 3] = [
        SortField::Mentions,
        SortField::PriceChange,
        SortField::SentimentChange,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortField::Mentions => "Mentions",
            SortField::PriceChange => "Price Change",
            SortField::SentimentChange => "Sentiment",
        }
    }

    /// Numeric sort key. Error records and unparsable values sort as negative infinity.
    pub fn key(self, record: &TickerRecord) -> f64 {
        let Some(valid) = record.as_valid() else {
            return f64::NEG_INFINITY;
        };
        let value = match self {
            SortField::Mentions => valid.mentions.count(),
            SortField::PriceChange => Some(valid.price_change),
            SortField::SentimentChange => Some(valid.sentiment_change),
        };
        value.filter(|v| !v.is_nan()).unwrap_or(f64::NEG_INFINITY)
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: SortField,
    pub descending: bool,
}

impl Default for SortState {
    fn default() -> Self {
        Self::new(SortField::Mentions)
    }
}

impl SortState {
    /// Descending sort on `field`.
    pub fn new(field: SortField) -> Self {
        Self {
            field,
            descending: true,
        }
    }

    /// Column-header click: the active field flips direction, a new field starts descending.
    pub fn request(self, field: SortField) -> Self {
        if self.field == field {
            Self {
                field,
                descending: !self.descending,
            }
        } else {
            Self::new(field)
        }
    }

    fn compare(&self, a: &TickerRecord, b: &TickerRecord) -> Ordering {
        let ka = self.field.key(a);
        let kb = self.field.key(b);
        let ord = ka.partial_cmp(&kb).unwrap_or(Ordering::Equal);
        if self.descending {
            ord.reverse()
        } else {
            ord
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TickerStore {
    records: IndexMap<String, TickerRecord>,
    generation: u64,
    updated_at: Option<DateTime<Utc>>,
}

impl TickerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new generation stamped with the current time.
    pub fn replace(&mut self, records: impl IntoIterator<Item = TickerRecord>) {
        self.replace_at(records, Utc::now());
    }

    /// Swap in a new generation. A duplicate ticker overwrites the earlier
    /// record but keeps its position.
    pub fn replace_at(
        &mut self,
        records: impl IntoIterator<Item = TickerRecord>,
        at: DateTime<Utc>,
    ) {
        self.records.clear();
        for record in records {
            self.records.insert(record.ticker().to_string(), record);
        }
        self.generation += 1;
        self.updated_at = Some(at);
    }

    /// All records ordered by `sort`, error rows at the negative-infinity end.
    ///
    /// The sort is stable in both directions: equal keys keep insertion order.
    pub fn sorted_view(&self, sort: SortState) -> Vec<(&str, &TickerRecord)> {
        let mut rows: Vec<(&str, &TickerRecord)> = self
            .records
            .iter()
            .map(|(ticker, record)| (ticker.as_str(), record))
            .collect();
        rows.sort_by(|(_, a), (_, b)| sort.compare(a, b));
        rows
    }

    /// Sorted view without error rows.
    pub fn valid_view(&self, sort: SortState) -> Vec<(&str, &TickerRecord)> {
        let mut rows = self.sorted_view(sort);
        rows.retain(|(_, record)| record.is_valid());
        rows
    }

    /// Next ticker in insertion order, `None` if `ticker` is last or unknown.
    pub fn get_successor(&self, ticker: &str) -> Option<&str> {
        let idx = self.records.get_index_of(ticker)?;
        self.records.get_index(idx + 1).map(|(t, _)| t.as_str())
    }

    pub fn get(&self, ticker: &str) -> Option<&TickerRecord> {
        self.records.get(ticker)
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn valid_count(&self) -> usize {
        self.records.values().filter(|r| r.is_valid()).count()
    }

    /// Number of `replace` calls so far; 0 before the first refresh.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}
