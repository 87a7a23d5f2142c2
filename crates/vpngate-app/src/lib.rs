//! vpngate-app - Application state and orchestration for vpngate-tui
//!
//! Implements the TEA (The Elm Architecture) pattern: [`Message`]s go through
//! [`handler::update`], which mutates [`AppState`] and may return an
//! [`UpdateAction`] that [`actions::process_message`] awaits in arrival order.
//! Also owns the sortable server table, the connection controller, settings
//! loading and signal handling.

pub mod actions;
pub mod config;
pub mod connection;
pub mod handler;
pub mod input_key;
pub mod message;
pub mod signals;
pub mod state;
pub mod table;

// Re-export primary types
pub use config::{load_settings, Settings};
pub use connection::ConnectionController;
pub use handler::{UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use message::Message;
pub use state::AppState;
pub use table::{Column, ServerRow, SortableTable};
