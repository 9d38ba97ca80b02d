//! Snapshot rendering: text table, CSV, JSON.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use apewatch_core::{
    color_for_percentage, format_percentage, RefreshStatus, SortState, TickerRecord,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// One flattened CSV row.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    rank: usize,
    ticker: &'a str,
    status: &'static str,
    mentions: Option<&'a str>,
    sentiment_change: Option<f64>,
    price_change: Option<f64>,
    first_price: Option<f64>,
    last_price: Option<f64>,
    points: Option<usize>,
    reason: Option<&'a str>,
}

impl<'a> CsvRow<'a> {
    fn new(rank: usize, record: &'a TickerRecord) -> Self {
        match record {
            TickerRecord::Valid(v) => Self {
                rank,
                ticker: &v.ticker,
                status: "valid",
                mentions: Some(v.mentions.raw()),
                sentiment_change: Some(v.sentiment_change),
                price_change: Some(v.price_change),
                first_price: Some(v.prices.first().price),
                last_price: Some(v.prices.last().price),
                points: Some(v.prices.len()),
                reason: None,
            },
            TickerRecord::Error(e) => Self {
                rank,
                ticker: &e.ticker,
                status: "error",
                mentions: None,
                sentiment_change: None,
                price_change: None,
                first_price: None,
                last_price: None,
                points: None,
                reason: Some(&e.reason),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonSnapshot<'a> {
    status: &'a RefreshStatus,
    sort: SortState,
    rows: Vec<&'a TickerRecord>,
}

pub fn write_csv<W: Write>(out: W, rows: &[(&str, &TickerRecord)]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for (i, (_, record)) in rows.iter().enumerate() {
        writer.serialize(CsvRow::new(i + 1, record))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(
    out: W,
    status: &RefreshStatus,
    sort: SortState,
    rows: &[(&str, &TickerRecord)],
) -> Result<()> {
    let snapshot = JsonSnapshot {
        status,
        sort,
        rows: rows.iter().map(|(_, r)| *r).collect(),
    };
    serde_json::to_writer_pretty(out, &snapshot)?;
    Ok(())
}

/// Wrap `text` in a 24-bit ANSI foreground color derived from `pct`.
///
/// Zero maps to black, which is unreadable on dark terminals; it is left uncolored.
fn paint(text: &str, pct: f64, color: bool) -> String {
    let (r, g, b) = color_for_percentage(pct).to_u8();
    if !color || (r, g, b) == (0, 0, 0) {
        return text.to_string();
    }
    format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m")
}

pub fn write_table<W: Write>(
    mut out: W,
    sort: SortState,
    rows: &[(&str, &TickerRecord)],
    color: bool,
) -> Result<()> {
    let direction = if sort.descending { "desc" } else { "asc" };
    writeln!(out, "Sorted by {} ({direction})", sort.field)?;
    writeln!(
        out,
        "{:>3}  {:<8} {:>9} {:>10} {:>10} {:>10}",
        "#", "Ticker", "Mentions", "Price", "Sentiment", "Last"
    )?;

    if rows.is_empty() {
        writeln!(out, "  (no tickers)")?;
    }

    for (i, (ticker, record)) in rows.iter().enumerate() {
        match record {
            TickerRecord::Valid(v) => {
                let price = format!("{:>10}", format_percentage(v.price_change));
                let sentiment = format!("{:>10}", format_percentage(v.sentiment_change));
                writeln!(
                    out,
                    "{:>3}  {:<8} {:>9} {} {} {:>10.2}",
                    i + 1,
                    ticker,
                    v.mentions.raw(),
                    paint(&price, v.price_change, color),
                    paint(&sentiment, v.sentiment_change, color),
                    v.prices.last().price,
                )?;
            }
            TickerRecord::Error(e) => {
                writeln!(out, "{:>3}  {:<8} error: {}", i + 1, ticker, e.reason)?;
            }
        }
    }
    Ok(())
}
