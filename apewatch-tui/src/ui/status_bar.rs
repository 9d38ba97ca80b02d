//! Bottom status bar — key hints, last update age, last status message.

use chrono::Utc;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use apewatch_core::{format_time_since, RefreshStatus};

use crate::app::{AppState, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = Vec::new();

    spans.push(Span::styled(
        " r:refresh m/p/s:sort j/k:move n:next e:errors q:quit",
        theme::muted(),
    ));
    spans.push(Span::raw(" | "));

    spans.push(Span::styled(update_label(app), theme::text()));

    if let RefreshStatus::Updated { failed, .. } = app.status {
        if failed > 0 && !app.show_errors {
            spans.push(Span::styled(format!(" ({failed} hidden)"), theme::muted()));
        }
    }

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn update_label(app: &AppState) -> String {
    format!(
        "Last update: {}",
        format_time_since(app.store.updated_at(), Utc::now())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::make_app;
    use apewatch_core::config::DashboardConfig;

    #[test]
    fn never_before_first_batch() {
        let (app, _rx) = make_app(&DashboardConfig::default());
        assert_eq!(update_label(&app), "Last update: Never");
    }
}
