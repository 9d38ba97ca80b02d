//! Intraday price chart for the selected ticker.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use apewatch_core::{format_percentage, PriceSeries, TickerRecord};

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    match app.selected_record() {
        Some(TickerRecord::Valid(v)) => {
            let label = format!("{} {}", v.ticker, format_percentage(v.price_change));
            render_chart(f, area, &v.prices, &label, v.price_change);
        }
        Some(TickerRecord::Error(e)) => {
            render_message(f, area, &format!("No price data for {}: {}", e.ticker, e.reason))
        }
        None => render_message(f, area, "Select a ticker to display its price history."),
    }
}

fn render_message(f: &mut Frame, area: Rect, msg: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(msg.to_string(), theme::muted())),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

/// (seconds since first point, price) pairs.
pub(crate) fn chart_points(series: &PriceSeries) -> Vec<(f64, f64)> {
    let t0 = series.first().timestamp;
    series
        .points()
        .iter()
        .map(|p| ((p.timestamp - t0).num_seconds() as f64, p.price))
        .collect()
}

fn render_chart(f: &mut Frame, area: Rect, series: &PriceSeries, label: &str, change: f64) {
    let (min_y, max_y) = series.price_range();
    let padding = ((max_y - min_y).abs() * 0.05).max(0.01);
    let y_min = min_y - padding;
    let y_max = max_y + padding;

    let data = chart_points(series);
    let x_max = data.last().map(|(x, _)| *x).unwrap_or(0.0);

    let dataset = Dataset::default()
        .name(label)
        .marker(symbols::Marker::Braille)
        .style(Style::default().fg(theme::percent_color(change)))
        .graph_type(GraphType::Line)
        .data(&data);

    let time_fmt = "%m-%d %H:%M";
    let chart = Chart::new(vec![dataset])
        .x_axis(
            Axis::default()
                .title(Span::styled("UTC", theme::muted()))
                .style(theme::muted())
                .bounds([0.0, x_max.max(1.0)])
                .labels(vec![
                    Span::styled(series.first().timestamp.format(time_fmt).to_string(), theme::muted()),
                    Span::styled(series.last().timestamp.format(time_fmt).to_string(), theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Price", theme::muted()))
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format!("{:.2}", y_min), theme::muted()),
                    Span::styled(format!("{:.2}", y_max), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}
