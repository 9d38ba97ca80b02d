//! Ticker table: rank, mentions, price move, sentiment move, last price.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use apewatch_core::{format_percentage, TickerRecord};

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let rows = app.visible_rows();
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        format!(
            "{:>3} {:<7} {:>9} {:>9} {:>9} {:>9}",
            "#", "Ticker", "Mentions", "Price", "Sentiment", "Last"
        ),
        theme::accent_bold(),
    )));

    if rows.is_empty() {
        lines.push(Line::from(""));
        let hint = if app.refresh_in_flight {
            "Fetching trending tickers…"
        } else {
            "No tickers yet. Press r to refresh."
        };
        lines.push(Line::from(Span::styled(hint, theme::muted())));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    // Scroll so the cursor stays on screen.
    let visible_height = area.height.saturating_sub(1).max(1) as usize;
    let cursor = app.selected_index();
    let start = cursor
        .map(|c| (c + 1).saturating_sub(visible_height))
        .unwrap_or(0);
    let end = (start + visible_height).min(rows.len());

    for (i, (ticker, record)) in rows.iter().enumerate().take(end).skip(start) {
        lines.push(row_line(i, ticker, record, cursor == Some(i)));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn row_line<'a>(i: usize, ticker: &'a str, record: &'a TickerRecord, is_cursor: bool) -> Line<'a> {
    let base = if is_cursor {
        theme::accent().add_modifier(Modifier::REVERSED)
    } else {
        theme::text()
    };
    // Percent cells keep their color under the cursor; only the modifier changes.
    let pct = |p: f64| -> Style {
        let style = theme::percent_style(p);
        if is_cursor {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style
        }
    };

    match record {
        TickerRecord::Valid(v) => Line::from(vec![
            Span::styled(format!("{:>3} ", i + 1), base),
            Span::styled(format!("{:<7} ", truncate(ticker, 7)), base),
            Span::styled(format!("{:>9} ", v.mentions.raw()), base),
            Span::styled(format!("{:>9} ", format_percentage(v.price_change)), pct(v.price_change)),
            Span::styled(
                format!("{:>9} ", format_percentage(v.sentiment_change)),
                pct(v.sentiment_change),
            ),
            Span::styled(format!("{:>9.2}", v.prices.last().price), base),
        ]),
        TickerRecord::Error(e) => {
            let style = if is_cursor { base } else { theme::muted() };
            Line::from(vec![
                Span::styled(format!("{:>3} ", i + 1), style),
                Span::styled(format!("{:<7} ", truncate(ticker, 7)), style),
                Span::styled(format!("error: {}", e.reason), style),
            ])
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max - 1).collect();
        format!("{head}.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_tickers() {
        assert_eq!(truncate("GME", 7), "GME");
        assert_eq!(truncate("BRK.B", 7), "BRK.B");
        assert_eq!(truncate("VERYLONGNAME", 7), "VERYLO.");
    }
}
