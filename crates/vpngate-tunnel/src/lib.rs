//! # vpngate-tunnel - Tunnel Process and Server Feed
//!
//! Owns everything that touches the outside world on behalf of the
//! connection controller: the OpenVPN child process, the scratch config file
//! it reads, the privilege check, the shared output buffer, and the VPN Gate
//! server feed.
//!
//! Depends on [`vpngate_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Process Management
//! - [`TunnelProcess`] - Spawn, stream and stop one tunnel child process
//! - [`TunnelCommand`] - Binary and stop grace period
//!
//! ### Output
//! - [`OutputSink`] - Line buffer shared with the renderer
//! - [`SinkWriter`] - Epoch-bound write handle for reader tasks
//!
//! ### Config File
//! - [`ConfigFile`] - Scoped scratch file, removed on drop
//! - [`decode_payload()`] - Base64 decode of a server's config
//!
//! ### Privilege
//! - [`PrivilegeProbe`] - Whether a tunnel may be started
//!
//! ### Feed
//! - [`fetch_servers()`], [`parse_server_list()`], [`filter_by_country()`]

pub mod config_file;
pub mod feed;
pub mod privilege;
pub mod process;
pub mod sink;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use config_file::{decode_payload, ConfigFile, DEFAULT_CONFIG_PATH};
pub use feed::{
    fetch_servers, filter_by_country, parse_server_list, ALL_COUNTRIES, DEFAULT_FEED_URL,
};
pub use privilege::{EffectiveUid, Fixed, PrivilegeProbe};
pub use process::{StopMode, TunnelCommand, TunnelProcess, DEFAULT_STOP_GRACE};
pub use sink::{OutputSink, SinkWriter, DEFAULT_CAPACITY};
