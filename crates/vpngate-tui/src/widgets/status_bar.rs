//! Status bar widget
//!
//! One line: connection state indicator, then the controller's status text,
//! or the key hints while there is none.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use vpngate_core::ConnectionState;

use crate::theme::{palette, styles};

pub const KEY_HINTS: &str = "c/p/s/e/u/t/f: sort  enter: connect  x: disconnect  q: quit";

pub struct StatusBar<'a> {
    state: ConnectionState,
    status: &'a str,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: ConnectionState, status: &'a str) -> Self {
        Self { state, status }
    }

    fn state_indicator(&self) -> Span<'static> {
        let (icon, label, style) = styles::state_indicator(self.state);
        Span::styled(format!("{} {}", icon, label), style)
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let separator = Span::styled(" │ ", Style::default().fg(palette::BORDER_DIM));
        let text = if self.status.is_empty() {
            Span::styled(KEY_HINTS, styles::text_muted())
        } else {
            Span::styled(self.status.to_string(), styles::text_primary())
        };

        let line = Line::from(vec![Span::raw(" "), self.state_indicator(), separator, text]);
        Paragraph::new(line).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;

    #[test]
    fn test_shows_hints_when_idle() {
        let mut term = TestTerminal::with_size(100, 1);
        term.render_widget(
            StatusBar::new(ConnectionState::Disconnected, ""),
            term.area(),
        );
        assert!(term.buffer_contains("Disconnected"));
        assert!(term.buffer_contains("enter: connect"));
    }

    #[test]
    fn test_shows_status_text_when_connected() {
        let mut term = TestTerminal::with_size(100, 1);
        term.render_widget(
            StatusBar::new(ConnectionState::Connected, "connect to 1.2.3.4 [x: disconnect]"),
            term.area(),
        );
        assert!(term.buffer_contains("● Connected"));
        assert!(term.buffer_contains("connect to 1.2.3.4 [x: disconnect]"));
        assert!(!term.buffer_contains("enter: connect"));
    }
}
