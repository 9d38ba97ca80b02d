//! Background worker thread — all network I/O runs here.
//!
//! The worker owns both sources and handles one command at a time, so
//! refreshes never overlap. Results go back to the main thread as whole
//! batches via `mpsc`.

use std::io;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use chrono::{DateTime, Utc};
use tracing::info;

use apewatch_core::collect_records;
use apewatch_core::data::{PriceSource, RankingSource};
use apewatch_core::TickerRecord;

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    Refresh,
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug, Clone)]
pub enum WorkerResponse {
    RefreshDone {
        records: Vec<TickerRecord>,
        at: DateTime<Utc>,
    },
    /// The ranking source failed; the store must keep its previous batch.
    RefreshFailed {
        reason: String,
        at: DateTime<Utc>,
    },
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    ranking: Box<dyn RankingSource>,
    prices: Box<dyn PriceSource>,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("apewatch-worker".into())
        .spawn(move || worker_loop(ranking.as_ref(), prices.as_ref(), rx, tx))
}

fn worker_loop(
    ranking: &dyn RankingSource,
    prices: &dyn PriceSource,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) {
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(WorkerCommand::Refresh) => {
                let resp = refresh(ranking, prices);
                if tx.send(resp).is_err() {
                    break;
                }
            }
        }
    }
    info!("worker stopped");
}

fn refresh(ranking: &dyn RankingSource, prices: &dyn PriceSource) -> WorkerResponse {
    let collected = collect_records(ranking, prices);
    let at = Utc::now();
    match collected {
        Ok(records) => WorkerResponse::RefreshDone { records, at },
        Err(e) => WorkerResponse::RefreshFailed {
            reason: e.to_string(),
            at,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apewatch_core::data::DataError;
    use apewatch_core::{PricePoint, PriceSeries, RankingEntry};
    use std::sync::mpsc;
    use std::time::Duration;

    struct StaticRanking(Option<Vec<RankingEntry>>);

    impl RankingSource for StaticRanking {
        fn name(&self) -> &str {
            "static"
        }

        fn fetch_ranking(&self) -> Result<Vec<RankingEntry>, DataError> {
            self.0
                .clone()
                .ok_or_else(|| DataError::ParseDrift("no rows".into()))
        }
    }

    struct FlatPrices;

    impl PriceSource for FlatPrices {
        fn name(&self) -> &str {
            "flat"
        }

        fn fetch_series(&self, _symbol: &str) -> Result<Option<PriceSeries>, DataError> {
            let t0 = Utc::now();
            Ok(PriceSeries::new(vec![
                PricePoint::new(t0, 10.0),
                PricePoint::new(t0 + chrono::Duration::minutes(15), 11.0),
            ]))
        }
    }

    fn run(ranking: StaticRanking) -> (Sender<WorkerCommand>, Receiver<WorkerResponse>, JoinHandle<()>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let handle = spawn_worker(Box::new(ranking), Box::new(FlatPrices), cmd_rx, resp_tx)
            .expect("spawn worker");
        (cmd_tx, resp_rx, handle)
    }

    #[test]
    fn worker_shutdown() {
        let (cmd_tx, _resp_rx, handle) = run(StaticRanking(Some(vec![])));
        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().expect("worker should join cleanly");
    }

    #[test]
    fn refresh_sends_whole_batch() {
        let entries = vec![
            RankingEntry::new("GME", "1,000", 2.0),
            RankingEntry::new("AMC", "500", -1.0),
        ];
        let (cmd_tx, resp_rx, handle) = run(StaticRanking(Some(entries)));

        cmd_tx.send(WorkerCommand::Refresh).unwrap();
        match resp_rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            WorkerResponse::RefreshDone { records, .. } => {
                let tickers: Vec<&str> = records.iter().map(TickerRecord::ticker).collect();
                assert_eq!(tickers, ["GME", "AMC"]);
                assert!(records.iter().all(TickerRecord::is_valid));
            }
            other => panic!("expected RefreshDone, got {other:?}"),
        }

        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn ranking_failure_is_reported_not_fatal() {
        let (cmd_tx, resp_rx, handle) = run(StaticRanking(None));

        cmd_tx.send(WorkerCommand::Refresh).unwrap();
        match resp_rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            WorkerResponse::RefreshFailed { reason, .. } => assert!(reason.contains("no rows")),
            other => panic!("expected RefreshFailed, got {other:?}"),
        }

        // Still alive after a failure.
        cmd_tx.send(WorkerCommand::Refresh).unwrap();
        assert!(resp_rx.recv_timeout(Duration::from_secs(5)).is_ok());

        drop(cmd_tx);
        handle.join().unwrap();
    }

    #[test]
    fn batch_time_follows_the_price_fetches() {
        let before = Utc::now();
        let ranking = StaticRanking(Some(vec![RankingEntry::new("GME", "1", 0.0)]));
        let WorkerResponse::RefreshDone { records, at } = refresh(&ranking, &FlatPrices) else {
            panic!("expected RefreshDone");
        };
        let fetched = records[0].as_valid().unwrap().prices.first().timestamp;
        assert!(fetched >= before);
        assert!(at >= fetched);
    }
}
