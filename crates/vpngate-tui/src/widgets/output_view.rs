//! Tunnel output pane

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Paragraph, Widget},
};
use vpngate_tunnel::OutputSink;

use crate::theme::styles;

/// Bordered pane showing the newest lines of tunnel output
pub struct OutputView<'a> {
    sink: &'a OutputSink,
}

impl<'a> OutputView<'a> {
    pub fn new(sink: &'a OutputSink) -> Self {
        Self { sink }
    }
}

impl Widget for OutputView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block =
            styles::glass_block(false).title(Line::from(" output ").style(styles::text_muted()));
        let inner = block.inner(area);

        let lines: Vec<Line> = self
            .sink
            .tail(inner.height as usize)
            .into_iter()
            .map(Line::raw)
            .collect();

        Paragraph::new(lines)
            .style(styles::text_primary())
            .block(block)
            .render(area, buf);
    }
}
