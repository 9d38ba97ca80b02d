//! Top-level UI layout — ticker table, price chart, status bar.

pub mod chart_panel;
pub mod status_bar;
pub mod table_panel;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    // Split: main area + 1-line status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[0]);

    let sort = app.sort;
    let arrow = if sort.descending { "▼" } else { "▲" };
    let table_area = draw_block(f, panes[0], format!(" Trending [{} {arrow}] ", sort.field), true);
    table_panel::render(f, table_area, app);

    let chart_title = match app.selected.as_deref() {
        Some(ticker) => format!(" {ticker} "),
        None => " Price ".to_string(),
    };
    let chart_area = draw_block(f, panes[1], chart_title, false);
    chart_panel::render(f, chart_area, app);

    status_bar::render(f, chunks[1], app);
}

/// Draw a bordered block and return its inner area.
fn draw_block(f: &mut Frame, area: Rect, title: String, active: bool) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(active))
        .title(title)
        .title_style(theme::panel_title(active));

    let inner = block.inner(area);
    f.render_widget(block, area);
    inner
}
