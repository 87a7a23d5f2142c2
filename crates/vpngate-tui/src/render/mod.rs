//! Main render/view function (View in TEA pattern)

use ratatui::Frame;
use vpngate_app::state::AppState;

use crate::layout;
use crate::widgets::{OutputView, ServerTable, StatusBar};

/// Render the complete UI.
///
/// Only `page_size` is written back, so PageUp/PageDown move by what is
/// actually on screen.
pub fn view(frame: &mut Frame, state: &mut AppState) {
    let areas = layout::create(frame.area());

    state.page_size = ServerTable::visible_rows(areas.servers).max(1);

    frame.render_widget(ServerTable::new(&state.table), areas.servers);
    frame.render_widget(OutputView::new(state.connection.sink()), areas.output);

    let status = state.connection.status();
    frame.render_widget(
        StatusBar::new(state.connection.state(), &status),
        areas.status,
    );
}
