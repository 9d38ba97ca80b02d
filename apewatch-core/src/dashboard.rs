//! Dashboard — one refresh cycle and the state a front end renders from.
//!
//! `refresh()` runs ranking fetch → per-ticker price fetch → record build →
//! store replace, sequentially on the calling thread. The caller must not run
//! two refreshes at once; the TUI serializes them on its worker thread.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::data::{DataError, HttpRankingSource, PriceSource, RankingSource, YahooPriceSource};
use crate::domain::{build, RankingEntry, TickerRecord};
use crate::format::format_time_since;
use crate::store::{SortField, SortState, TickerStore};

/// Outcome of the most recent refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RefreshStatus {
    Never,
    Updated {
        at: DateTime<Utc>,
        valid: usize,
        failed: usize,
    },
    /// Ranking fetch failed; the store still holds the previous generation.
    SourceUnavailable { at: DateTime<Utc>, reason: String },
}

impl RefreshStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, RefreshStatus::SourceUnavailable { .. })
    }
}

/// Fetch the ranking and price every entry, in ranking order.
///
/// Price failures become error records; only a ranking failure is an error.
pub fn collect_records(
    ranking: &dyn RankingSource,
    prices: &dyn PriceSource,
) -> Result<Vec<TickerRecord>, DataError> {
    let entries: Vec<RankingEntry> = ranking.fetch_ranking()?;
    let records = entries
        .into_iter()
        .map(|entry| {
            let series = prices.fetch_prices(&entry.ticker);
            build(entry, series)
        })
        .collect();
    Ok(records)
}

/// Replace the store contents with a finished batch and report the outcome.
///
/// `at` should be taken after the batch was collected, so "last update"
/// never predates the prices it shows.
pub fn apply_batch(
    store: &mut TickerStore,
    records: Vec<TickerRecord>,
    at: DateTime<Utc>,
) -> RefreshStatus {
    store.replace_at(records, at);
    let valid = store.valid_count();
    let failed = store.len() - valid;
    info!(valid, failed, generation = store.generation(), "store updated");
    RefreshStatus::Updated { at, valid, failed }
}

pub struct Dashboard {
    ranking: Box<dyn RankingSource>,
    prices: Box<dyn PriceSource>,
    store: TickerStore,
    sort: SortState,
    status: RefreshStatus,
}

impl Dashboard {
    pub fn new(ranking: Box<dyn RankingSource>, prices: Box<dyn PriceSource>) -> Self {
        Self {
            ranking,
            prices,
            store: TickerStore::new(),
            sort: SortState::default(),
            status: RefreshStatus::Never,
        }
    }

    /// Dashboard backed by ApeWisdom and Yahoo Finance.
    pub fn from_config(config: &AppConfig) -> Result<Self, DataError> {
        let ranking = HttpRankingSource::new(&config.ranking)?;
        let prices = YahooPriceSource::new(&config.prices)?;
        let mut dashboard = Self::new(Box::new(ranking), Box::new(prices));
        dashboard.sort = SortState::new(config.dashboard.sort);
        Ok(dashboard)
    }

    pub fn refresh(&mut self) -> &RefreshStatus {
        let collected = collect_records(self.ranking.as_ref(), self.prices.as_ref());
        let now = Utc::now();
        self.status = match collected {
            Ok(records) => self.apply(records, now),
            Err(e) => {
                warn!(source = self.ranking.name(), error = %e, "refresh aborted, keeping previous data");
                RefreshStatus::SourceUnavailable {
                    at: now,
                    reason: e.to_string(),
                }
            }
        };
        &self.status
    }

    /// Install a batch produced elsewhere (e.g. on a worker thread).
    pub fn apply(&mut self, records: Vec<TickerRecord>, at: DateTime<Utc>) -> RefreshStatus {
        self.status = apply_batch(&mut self.store, records, at);
        self.status.clone()
    }

    pub fn request_sort(&mut self, field: SortField) -> SortState {
        self.sort = self.sort.request(field);
        self.sort
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    pub fn rows(&self) -> Vec<(&str, &TickerRecord)> {
        self.store.sorted_view(self.sort)
    }

    pub fn valid_rows(&self) -> Vec<(&str, &TickerRecord)> {
        self.store.valid_view(self.sort)
    }

    pub fn get_successor(&self, ticker: &str) -> Option<&str> {
        self.store.get_successor(ticker)
    }

    pub fn store(&self) -> &TickerStore {
        &self.store
    }

    pub fn status(&self) -> &RefreshStatus {
        &self.status
    }

    /// `"Last update: 2m 5s ago"`, or the failure reason after an aborted refresh.
    pub fn status_line(&self, now: DateTime<Utc>) -> String {
        match &self.status {
            RefreshStatus::SourceUnavailable { reason, .. } => {
                format!("Error fetching tickers: {reason}")
            }
            _ => format!(
                "Last update: {}",
                format_time_since(self.store.updated_at(), now)
            ),
        }
    }
}
