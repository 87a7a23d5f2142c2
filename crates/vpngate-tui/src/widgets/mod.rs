//! Custom widgets for the TUI

mod output_view;
mod server_table;
mod status_bar;

pub use output_view::OutputView;
pub use server_table::ServerTable;
pub use status_bar::{StatusBar, KEY_HINTS};
