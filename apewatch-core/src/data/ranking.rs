//! ApeWisdom ranking page: HTTP fetch plus an isolated HTML adapter.
//!
//! The page has no API. Rows are read from `td.td-right` cells in groups of
//! three (rank, ticker, mentions) and sentiment deltas from the
//! `percentage-green` / `percentage-red` spans, matched to rows by position.
//! All knowledge of that layout lives in [`ApeWisdomParser`]; if the page
//! changes, only the parser (or its selectors in config) needs to move.

use scraper::{Html, Selector};
use tracing::{debug, info, warn};

use super::provider::{build_client, DataError, RankingSource};
use crate::config::RankingConfig;
use crate::domain::RankingEntry;

/// Turns a ranking page body into entries.
pub trait RankingPageParser: Send + Sync {
    fn parse(&self, html: &str) -> Result<Vec<RankingEntry>, DataError>;
}

#[derive(Debug)]
pub struct ApeWisdomParser {
    cells: Selector,
    sentiments: Selector,
    cell_window: usize,
    top_n: usize,
}

impl ApeWisdomParser {
    pub fn from_config(config: &RankingConfig) -> Result<Self, DataError> {
        Ok(Self {
            cells: parse_selector(&config.cell_selector)?,
            sentiments: parse_selector(&config.sentiment_selector)?,
            cell_window: config.cell_window,
            top_n: config.top_n,
        })
    }
}

fn parse_selector(css: &str) -> Result<Selector, DataError> {
    Selector::parse(css).map_err(|e| DataError::Client(format!("bad selector `{css}`: {e}")))
}

/// `"12.5%"` → 12.5. Anything unparsable counts as no change.
fn parse_sentiment(text: &str) -> f64 {
    text.trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// A ticker cell holding only digits is a rank cell from a misaligned group.
fn is_rank_cell(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

impl RankingPageParser for ApeWisdomParser {
    fn parse(&self, html: &str) -> Result<Vec<RankingEntry>, DataError> {
        let document = Html::parse_document(html);

        let cells: Vec<String> = document
            .select(&self.cells)
            .take(self.cell_window * 3)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .collect();

        let sentiments: Vec<f64> = document
            .select(&self.sentiments)
            .map(|el| parse_sentiment(&el.text().collect::<String>()))
            .collect();

        debug!(
            cells = cells.len(),
            sentiments = sentiments.len(),
            "parsed ranking page"
        );

        let mut entries = Vec::new();
        let mut sentiment_idx = 0;
        for group in cells.chunks_exact(3) {
            let ticker = &group[1];
            let mentions = &group[2];

            if is_rank_cell(ticker) {
                debug!(%ticker, "skipping misaligned ticker cell");
                continue;
            }

            let sentiment = sentiments.get(sentiment_idx).copied().unwrap_or(0.0);
            sentiment_idx += 1;

            entries.push(RankingEntry::new(ticker.as_str(), mentions.as_str(), sentiment));
        }
        entries.truncate(self.top_n);

        if entries.is_empty() {
            return Err(DataError::ParseDrift(format!(
                "no ranking rows ({} cells, {} sentiment spans)",
                cells.len(),
                sentiments.len()
            )));
        }
        Ok(entries)
    }
}

/// Fetches the ranking page over HTTP and hands the body to a parser.
pub struct HttpRankingSource {
    client: reqwest::blocking::Client,
    url: String,
    parser: Box<dyn RankingPageParser>,
}

impl HttpRankingSource {
    pub fn new(config: &RankingConfig) -> Result<Self, DataError> {
        let parser = ApeWisdomParser::from_config(config)?;
        Self::with_parser(config, Box::new(parser))
    }

    pub fn with_parser(
        config: &RankingConfig,
        parser: Box<dyn RankingPageParser>,
    ) -> Result<Self, DataError> {
        Ok(Self {
            client: build_client(config.timeout_secs, &config.user_agent)?,
            url: config.url.clone(),
            parser,
        })
    }

    fn fetch_body(&self) -> Result<String, DataError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| DataError::from_request(e, &self.url))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        resp.text()
            .map_err(|e| DataError::NetworkUnreachable(format!("read body: {e}")))
    }
}

impl RankingSource for HttpRankingSource {
    fn name(&self) -> &str {
        "apewisdom"
    }

    fn fetch_ranking(&self) -> Result<Vec<RankingEntry>, DataError> {
        let result = self.fetch_body().and_then(|body| self.parser.parse(&body));
        match &result {
            Ok(entries) => info!(url = %self.url, entries = entries.len(), "fetched ranking"),
            Err(e) => warn!(url = %self.url, error = %e, "ranking fetch failed"),
        }
        result
    }
}
