//! Parrot/neon theme tokens for the ApeWatch dashboard.
//!
//! # Color Palette
//! - **Accent**: Electric cyan (focus, headers)
//! - **Negative**: Hot pink (error messages)
//! - **Warning**: Neon orange
//! - **Muted**: Steel blue (hints, error rows)
//!
//! Percentage cells do not use the palette: they take the continuous
//! red/green intensity from `apewatch_core::color_for_percentage`.

use ratatui::style::{Color, Modifier, Style};

use apewatch_core::color_for_percentage;

pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT_PRIMARY: Color = Color::White;
pub const TEXT_SECONDARY: Color = Color::Rgb(170, 170, 170);

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT_PRIMARY)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

/// Terminal color for a percentage change.
///
/// A flat 0% maps to black, which disappears on a dark background; it is
/// drawn in secondary text instead.
pub fn percent_color(pct: f64) -> Color {
    match color_for_percentage(pct).to_u8() {
        (0, 0, 0) => TEXT_SECONDARY,
        (r, g, b) => Color::Rgb(r, g, b),
    }
}

pub fn percent_style(pct: f64) -> Style {
    Style::default().fg(percent_color(pct))
}
