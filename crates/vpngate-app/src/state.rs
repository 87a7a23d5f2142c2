//! Application state (Model in TEA pattern)

use std::sync::Arc;

use crate::connection::ConnectionController;
use crate::table::SortableTable;
use vpngate_core::ConnectionState;

/// Rows moved by PageUp/PageDown until the renderer reports the real height
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Complete application state
#[derive(Debug)]
pub struct AppState {
    /// Server list with ordering and cursor
    pub table: SortableTable,

    /// Tunnel lifecycle, shared with action tasks
    pub connection: Arc<ConnectionController>,

    /// Visible table rows, updated by the renderer
    pub page_size: usize,

    /// Should the application quit?
    pub should_quit: bool,
}

impl AppState {
    pub fn new(table: SortableTable, connection: Arc<ConnectionController>) -> Self {
        Self {
            table,
            connection,
            page_size: DEFAULT_PAGE_SIZE,
            should_quit: false,
        }
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}
