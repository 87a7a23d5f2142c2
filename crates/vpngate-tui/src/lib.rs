//! vpngate-tui - Terminal UI for vpngate-tui
//!
//! Provides the ratatui-based interface over the vpngate-app state: terminal
//! setup, crossterm input conversion, rendering, and the main event loop.

pub mod event;
pub mod layout;
pub mod render;
pub mod runner;
pub mod terminal;
pub mod theme;
pub mod widgets;

#[cfg(test)]
pub mod test_utils;

// Re-export main entry point
pub use runner::run;
