//! Screen layout definitions for the TUI

use ratatui::layout::{Constraint, Layout, Rect};

/// Screen areas for the main layout
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    /// Server table (bordered)
    pub servers: Rect,

    /// Tunnel output (bordered)
    pub output: Rect,

    /// One-line status bar
    pub status: Rect,
}

/// Split the screen: table and output share the height, status gets one row
pub fn create(area: Rect) -> ScreenAreas {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    ScreenAreas {
        servers: chunks[0],
        output: chunks[1],
        status: chunks[2],
    }
}
