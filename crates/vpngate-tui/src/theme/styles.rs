//! Semantic style builders

use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};
use vpngate_core::ConnectionState;

use super::palette;

pub fn text_primary() -> Style {
    Style::default().fg(palette::TEXT_PRIMARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(palette::TEXT_MUTED)
}

pub fn header() -> Style {
    Style::default()
        .fg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// "Black on Cyan" for the row under the cursor
pub fn focused_selected() -> Style {
    Style::default()
        .fg(palette::CONTRAST_FG)
        .bg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn glass_block(focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            Style::default().fg(palette::BORDER_ACTIVE)
        } else {
            Style::default().fg(palette::BORDER_DIM)
        })
}

/// Returns `(icon, label, Style)` for the connection state
pub fn state_indicator(state: ConnectionState) -> (&'static str, &'static str, Style) {
    match state {
        ConnectionState::Connected => (
            "●",
            "Connected",
            Style::default()
                .fg(palette::STATUS_GREEN)
                .add_modifier(Modifier::BOLD),
        ),
        ConnectionState::Connecting => (
            "↻",
            "Connecting",
            Style::default()
                .fg(palette::STATUS_YELLOW)
                .add_modifier(Modifier::BOLD),
        ),
        ConnectionState::Disconnecting => (
            "↻",
            "Disconnecting",
            Style::default().fg(palette::STATUS_YELLOW),
        ),
        ConnectionState::Disconnected => (
            "○",
            "Disconnected",
            Style::default().fg(palette::STATUS_GRAY),
        ),
    }
}
