//! Message types for the application (TEA pattern)

use crate::input_key::InputKey;
use vpngate_core::{SortKey, TunnelEvent};

/// All possible messages/actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Keyboard event from terminal
    Key(InputKey),

    /// Tick event for periodic updates
    Tick,

    /// Terminal was resized
    Resize,

    /// Request to quit the application
    Quit,

    /// Notification from the tunnel worker
    Tunnel(TunnelEvent),

    // ─────────────────────────────────────────────────────────
    // Server table
    // ─────────────────────────────────────────────────────────
    /// Sort by a column, or flip the direction if it is already active
    SortBy(SortKey),
    SelectNext,
    SelectPrevious,
    SelectFirst,
    SelectLast,
    PageDown,
    PageUp,

    // ─────────────────────────────────────────────────────────
    // Connection
    // ─────────────────────────────────────────────────────────
    /// Connect to the server under the cursor
    ConnectSelected,
    /// Stop the running tunnel
    Disconnect,
}
