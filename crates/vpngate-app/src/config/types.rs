//! Configuration types for vpngate-tui
//!
//! Defines:
//! - `Settings` - Global application settings
//! - `TunnelSettings`, `FeedSettings`, `UiSettings` - Its sections

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use vpngate_tunnel::{DEFAULT_CAPACITY, DEFAULT_CONFIG_PATH, DEFAULT_FEED_URL};

/// Application settings (config.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub tunnel: TunnelSettings,

    #[serde(default)]
    pub feed: FeedSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

/// How the tunnel process is launched and stopped
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TunnelSettings {
    /// Tunnel binary, looked up in PATH
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Where the decoded configuration is written
    #[serde(default = "default_config_path")]
    pub config_path: PathBuf,

    /// Milliseconds between SIGTERM and SIGKILL
    #[serde(default = "default_stop_grace_ms")]
    pub stop_grace_ms: u64,

    /// Refuse to connect unless running as root
    #[serde(default = "default_true")]
    pub require_root: bool,
}

impl Default for TunnelSettings {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            config_path: default_config_path(),
            stop_grace_ms: default_stop_grace_ms(),
            require_root: true,
        }
    }
}

impl TunnelSettings {
    pub fn stop_grace(&self) -> Duration {
        Duration::from_millis(self.stop_grace_ms)
    }
}

/// Where the server list comes from
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FeedSettings {
    #[serde(default = "default_feed_url")]
    pub url: String,

    /// Short country code to keep, or "ALL"
    #[serde(default = "default_country")]
    pub country: String,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            country: default_country(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UiSettings {
    /// Lines of tunnel output kept for the output pane
    #[serde(default = "default_output_lines")]
    pub output_lines: usize,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            output_lines: default_output_lines(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_binary() -> String {
    "openvpn".to_string()
}

fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_PATH)
}

fn default_stop_grace_ms() -> u64 {
    3000
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_country() -> String {
    "JP".to_string()
}

fn default_output_lines() -> usize {
    DEFAULT_CAPACITY
}
