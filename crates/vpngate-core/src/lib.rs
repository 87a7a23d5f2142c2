//! # vpngate-core - Core Domain Types
//!
//! Foundation crate for vpngate-tui. Provides the endpoint record, sort keys,
//! connection state, tunnel events, error handling and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (thiserror, tracing, dirs).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`EndpointRecord`] - One VPN Gate relay as advertised by the feed
//! - [`SortKey`], [`Direction`], [`SortOrder`] - Table ordering
//! - [`ConnectionState`] - Lifecycle of the single tunnel
//!
//! ### Events (`events`)
//! - [`TunnelEvent`] - Notifications emitted by the tunnel worker
//! - [`SessionId`] - Identifies one spawned tunnel process
//!
//! ### Formatting (`format`)
//! - [`uptime_to_string()`], [`traffic_to_string()`] - Lossy display conversions
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! ```rust
//! use vpngate_core::prelude::*;
//! ```

pub mod error;
pub mod events;
pub mod format;
pub mod logging;
pub mod types;

/// Prelude for common imports used throughout all vpngate crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

pub use error::{Error, Result, ResultExt};
pub use events::{SessionId, TunnelEvent};
pub use format::{traffic_to_string, uptime_to_string, BYTES_PER_GB, MILLIS_PER_DAY};
pub use types::{ConnectionState, Direction, EndpointRecord, SortKey, SortOrder};
