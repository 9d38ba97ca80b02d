//! Application state — single-owner, main-thread only.
//!
//! The store lives here; the worker thread owns the HTTP sources and sends
//! whole record batches back over a channel.

use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::warn;

use apewatch_core::config::DashboardConfig;
use apewatch_core::{apply_batch, RefreshStatus, SortField, SortState, TickerRecord, TickerStore};

use crate::worker::{WorkerCommand, WorkerResponse};

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

pub struct AppState {
    pub running: bool,
    pub store: TickerStore,
    pub sort: SortState,
    pub status: RefreshStatus,
    pub selected: Option<String>,
    pub show_errors: bool,
    pub refresh_in_flight: bool,
    /// When the last refresh was requested. Drives the auto-refresh timer.
    pub last_request: Option<Instant>,
    /// `None` disables auto refresh.
    pub refresh_interval: Option<Duration>,
    pub status_message: Option<(String, StatusLevel)>,
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        config: &DashboardConfig,
    ) -> Self {
        let refresh_interval = match config.refresh_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        Self {
            running: true,
            store: TickerStore::new(),
            sort: SortState::new(config.sort),
            status: RefreshStatus::Never,
            selected: None,
            show_errors: config.show_errors,
            refresh_in_flight: false,
            last_request: None,
            refresh_interval,
            status_message: None,
            worker_tx,
            worker_rx,
        }
    }

    /// Rows in display order, with error rows filtered unless toggled on.
    pub fn visible_rows(&self) -> Vec<(&str, &TickerRecord)> {
        if self.show_errors {
            self.store.sorted_view(self.sort)
        } else {
            self.store.valid_view(self.sort)
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected.as_deref()?;
        self.visible_rows().iter().position(|(t, _)| *t == selected)
    }

    pub fn selected_record(&self) -> Option<&TickerRecord> {
        self.store.get(self.selected.as_deref()?)
    }

    /// Ask the worker for a refresh. Ignored while one is in flight.
    pub fn request_refresh(&mut self) {
        if self.refresh_in_flight {
            self.set_warning("Refresh already in progress");
            return;
        }
        match self.worker_tx.send(WorkerCommand::Refresh) {
            Ok(()) => {
                self.refresh_in_flight = true;
                self.last_request = Some(Instant::now());
                self.set_status("Refreshing…");
            }
            Err(_) => self.set_error("Worker thread is gone"),
        }
    }

    pub fn refresh_due(&self, now: Instant) -> bool {
        let Some(interval) = self.refresh_interval else {
            return false;
        };
        if self.refresh_in_flight {
            return false;
        }
        match self.last_request {
            Some(at) => now.duration_since(at) >= interval,
            None => true,
        }
    }

    pub fn handle_worker_response(&mut self, resp: WorkerResponse) {
        self.refresh_in_flight = false;
        match resp {
            WorkerResponse::RefreshDone { records, at } => self.apply_batch(records, at),
            WorkerResponse::RefreshFailed { reason, at } => {
                warn!(%reason, "refresh failed, keeping previous data");
                self.set_error("Error fetching tickers from ApeWisdom!");
                self.status = RefreshStatus::SourceUnavailable { at, reason };
            }
        }
    }

    fn apply_batch(&mut self, records: Vec<TickerRecord>, at: DateTime<Utc>) {
        self.status = apply_batch(&mut self.store, records, at);
        self.status_message = None;
        self.ensure_selection();
    }

    pub fn request_sort(&mut self, field: SortField) {
        self.sort = self.sort.request(field);
        let direction = if self.sort.descending { "descending" } else { "ascending" };
        self.set_status(format!("Sorted by {} ({direction})", self.sort.field));
    }

    pub fn toggle_errors(&mut self) {
        self.show_errors = !self.show_errors;
        self.ensure_selection();
        let state = if self.show_errors { "shown" } else { "hidden" };
        self.set_status(format!("Error rows {state}"));
    }

    pub fn select_next(&mut self) {
        self.step_selection(1);
    }

    pub fn select_prev(&mut self) {
        self.step_selection(-1);
    }

    fn step_selection(&mut self, delta: isize) {
        let rows = self.visible_rows();
        if rows.is_empty() {
            return;
        }
        let next = match self.selected_index() {
            Some(i) => i.saturating_add_signed(delta).min(rows.len() - 1),
            None => 0,
        };
        self.selected = Some(rows[next].0.to_string());
    }

    /// Jump to the next ticker in ranking order, skipping hidden rows.
    pub fn select_successor(&mut self) {
        let Some(mut current) = self.selected.clone() else {
            self.ensure_selection();
            return;
        };
        while let Some(next) = self.store.get_successor(&current) {
            let visible = self.show_errors || self.store.get(next).is_some_and(TickerRecord::is_valid);
            if visible {
                self.selected = Some(next.to_string());
                return;
            }
            current = next.to_string();
        }
    }

    /// Keep the selection if it is still visible, otherwise fall back to the top row.
    fn ensure_selection(&mut self) {
        if self.selected_index().is_some() {
            return;
        }
        self.selected = self.visible_rows().first().map(|(t, _)| t.to_string());
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use apewatch_core::domain::build;
    use apewatch_core::{PricePoint, PriceSeries, RankingEntry};
    use chrono::TimeZone;
    use std::sync::mpsc;

    pub(crate) fn make_app(config: &DashboardConfig) -> (AppState, Receiver<WorkerCommand>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (_resp_tx, resp_rx) = mpsc::channel();
        (AppState::new(cmd_tx, resp_rx, config), cmd_rx)
    }

    /// (ticker, mentions, sentiment, first, last); `first == 0.0` yields no series.
    pub(crate) fn batch(rows: &[(&str, &str, f64, f64, f64)]) -> Vec<TickerRecord> {
        let t0 = Utc.with_ymd_and_hms(2024, 6, 3, 13, 30, 0).unwrap();
        rows.iter()
            .map(|&(ticker, mentions, sentiment, first, last)| {
                let series = if first == 0.0 {
                    None
                } else {
                    PriceSeries::new(vec![
                        PricePoint::new(t0, first),
                        PricePoint::new(t0 + chrono::Duration::minutes(15), last),
                    ])
                };
                build(RankingEntry::new(ticker, mentions, sentiment), series)
            })
            .collect()
    }

    fn done(records: Vec<TickerRecord>) -> WorkerResponse {
        WorkerResponse::RefreshDone {
            records,
            at: Utc.with_ymd_and_hms(2024, 6, 3, 14, 0, 0).unwrap(),
        }
    }

    fn sample() -> Vec<TickerRecord> {
        batch(&[
            ("GME", "3,000", 1.0, 20.0, 22.0),
            ("XXX", "2,500", 9.0, 0.0, 0.0),
            ("AMC", "2,000", 5.0, 4.0, 3.0),
            ("TSLA", "1,000", -2.0, 200.0, 210.0),
        ])
    }

    #[test]
    fn refresh_is_not_sent_twice_while_in_flight() {
        let (mut app, cmd_rx) = make_app(&DashboardConfig::default());
        app.request_refresh();
        app.request_refresh();

        assert!(matches!(cmd_rx.try_recv(), Ok(WorkerCommand::Refresh)));
        assert!(cmd_rx.try_recv().is_err());
        assert_eq!(app.status_message.as_ref().map(|(_, l)| *l), Some(StatusLevel::Warning));

        app.handle_worker_response(done(sample()));
        assert!(!app.refresh_in_flight);
        app.request_refresh();
        assert!(matches!(cmd_rx.try_recv(), Ok(WorkerCommand::Refresh)));
    }

    #[test]
    fn batch_selects_top_visible_row_and_hides_errors() {
        let (mut app, _rx) = make_app(&DashboardConfig::default());
        app.handle_worker_response(done(sample()));

        assert_eq!(app.selected.as_deref(), Some("GME"));
        let tickers: Vec<&str> = app.visible_rows().into_iter().map(|(t, _)| t).collect();
        assert_eq!(tickers, ["GME", "AMC", "TSLA"]);
        assert!(matches!(app.status, RefreshStatus::Updated { valid: 3, failed: 1, .. }));

        app.toggle_errors();
        assert_eq!(app.visible_rows().len(), 4);
    }

    #[test]
    fn failed_refresh_keeps_store_and_selection() {
        let (mut app, _rx) = make_app(&DashboardConfig::default());
        app.handle_worker_response(done(sample()));
        app.select_next();

        app.handle_worker_response(WorkerResponse::RefreshFailed {
            reason: "page structure changed".into(),
            at: Utc::now(),
        });

        assert_eq!(app.store.generation(), 1);
        assert_eq!(app.selected.as_deref(), Some("AMC"));
        assert!(app.status.is_failure());
        assert_eq!(
            app.status_message,
            Some(("Error fetching tickers from ApeWisdom!".to_string(), StatusLevel::Error))
        );
    }

    #[test]
    fn selection_follows_ticker_across_resort() {
        let (mut app, _rx) = make_app(&DashboardConfig::default());
        app.handle_worker_response(done(sample()));
        app.select_next();
        assert_eq!(app.selected.as_deref(), Some("AMC"));

        app.request_sort(SortField::PriceChange);
        assert_eq!(app.selected.as_deref(), Some("AMC"));
        assert_eq!(app.selected_index(), Some(2));
    }

    #[test]
    fn selection_clamps_at_both_ends() {
        let (mut app, _rx) = make_app(&DashboardConfig::default());
        app.handle_worker_response(done(sample()));

        app.select_prev();
        assert_eq!(app.selected.as_deref(), Some("GME"));
        for _ in 0..10 {
            app.select_next();
        }
        assert_eq!(app.selected.as_deref(), Some("TSLA"));
    }

    #[test]
    fn successor_skips_hidden_error_rows() {
        let (mut app, _rx) = make_app(&DashboardConfig::default());
        app.handle_worker_response(done(sample()));

        app.select_successor();
        assert_eq!(app.selected.as_deref(), Some("AMC"));

        app.toggle_errors();
        app.selected = Some("GME".into());
        app.select_successor();
        assert_eq!(app.selected.as_deref(), Some("XXX"));
    }

    #[test]
    fn hiding_errors_moves_selection_off_error_row() {
        let config = DashboardConfig {
            show_errors: true,
            ..DashboardConfig::default()
        };
        let (mut app, _rx) = make_app(&config);
        app.handle_worker_response(done(sample()));
        app.selected = Some("XXX".into());

        app.toggle_errors();
        assert_eq!(app.selected.as_deref(), Some("GME"));
    }

    #[test]
    fn refresh_timer() {
        let config = DashboardConfig {
            refresh_interval_secs: 60,
            ..DashboardConfig::default()
        };
        let (mut app, _rx) = make_app(&config);
        let now = Instant::now();
        assert!(app.refresh_due(now));

        app.request_refresh();
        assert!(!app.refresh_due(now + Duration::from_secs(120)));

        app.handle_worker_response(done(sample()));
        let requested = app.last_request.unwrap();
        assert!(!app.refresh_due(requested + Duration::from_secs(59)));
        assert!(app.refresh_due(requested + Duration::from_secs(60)));
    }

    #[test]
    fn zero_interval_disables_timer() {
        let config = DashboardConfig {
            refresh_interval_secs: 0,
            ..DashboardConfig::default()
        };
        let (app, _rx) = make_app(&config);
        assert!(!app.refresh_due(Instant::now()));
    }
}
