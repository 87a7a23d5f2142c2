//! Configuration file parsing for vpngate-tui
//!
//! Supports `<config dir>/vpngate/config.toml` with `[tunnel]`, `[feed]` and
//! `[ui]` sections; every field has a default.

pub mod settings;
pub mod types;

pub use settings::{default_config_path, load_settings};
pub use types::*;
