//! Test utilities for tunnel types
//!
//! The tunnel is launched as `<binary> <config-path>`. Using `sh` as the
//! binary turns the decoded config payload into a shell script, which lets
//! tests drive the full connect path without OpenVPN or root.

use base64::Engine;
use vpngate_core::EndpointRecord;

/// Binary that runs the config file as a script
pub const SHELL_TUNNEL: &str = "sh";

/// Base64 payload that `sh` will execute as `script`
pub fn shell_payload(script: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(script)
}

/// Creates a test endpoint with the given host and IP and a valid payload.
pub fn test_endpoint(host: &str, ip: &str) -> EndpointRecord {
    EndpointRecord {
        host_name: host.to_string(),
        ip: ip.to_string(),
        score: 100,
        ping: "10".to_string(),
        speed: 1_000_000,
        country_long: "Japan".to_string(),
        country_short: "JP".to_string(),
        config_base64: shell_payload("exit 0\n"),
        ..Default::default()
    }
}

/// Creates a test endpoint whose tunnel runs `script`.
pub fn scripted_endpoint(host: &str, ip: &str, script: &str) -> EndpointRecord {
    EndpointRecord {
        config_base64: shell_payload(script),
        ..test_endpoint(host, ip)
    }
}
