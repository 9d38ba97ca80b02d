//! Keyboard input dispatch.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use apewatch_core::SortField;

use crate::app::AppState;

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.running = false,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false
        }
        KeyCode::Char('r') => app.request_refresh(),
        KeyCode::Char('m') => app.request_sort(SortField::Mentions),
        KeyCode::Char('p') => app.request_sort(SortField::PriceChange),
        KeyCode::Char('s') => app.request_sort(SortField::SentimentChange),
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Char('n') | KeyCode::Tab => app.select_successor(),
        KeyCode::Char('e') => app.toggle_errors(),
        _ => {}
    }
}
