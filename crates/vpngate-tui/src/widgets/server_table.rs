//! Server table widget

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    text::Line,
    widgets::{Row, StatefulWidget, Table, TableState, Widget},
};
use vpngate_app::table::{SortableTable, COLUMN_COUNT};

use crate::theme::styles;

/// Column widths in [`vpngate_app::Column::ALL`] order. Wide enough for the
/// header label plus its direction glyph.
const WIDTHS: [u16; COLUMN_COUNT] = [11, 16, 8, 11, 10, 10, 14, 16];

/// Bordered table of servers with the cursor row highlighted
pub struct ServerTable<'a> {
    table: &'a SortableTable,
}

impl<'a> ServerTable<'a> {
    pub fn new(table: &'a SortableTable) -> Self {
        Self { table }
    }

    /// Data rows that fit in `area` once borders and the header are drawn
    pub fn visible_rows(area: Rect) -> usize {
        area.height.saturating_sub(3) as usize
    }
}

impl Widget for ServerTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block =
            styles::glass_block(true).title(Line::from(" servers ").style(styles::header()));

        let header = Row::new(self.table.headers()).style(styles::header());
        let rows: Vec<Row> = self
            .table
            .rows()
            .iter()
            .map(|row| Row::new(row.cells().map(String::from)).style(styles::text_primary()))
            .collect();

        let table = Table::new(rows, WIDTHS.map(Constraint::Length))
            .header(header)
            .block(block)
            .row_highlight_style(styles::focused_selected());

        let mut state = TableState::default().with_selected(self.table.selected_index());
        StatefulWidget::render(table, area, buf, &mut state);
    }
}
