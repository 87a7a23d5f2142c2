//! Settings loader for config.toml

use super::types::Settings;
use std::path::{Path, PathBuf};
use vpngate_core::prelude::*;

const CONFIG_FILENAME: &str = "config.toml";
const APP_DIR: &str = "vpngate";

/// Default settings location: `<config dir>/vpngate/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILENAME))
}

/// Load settings from `path`, or from the default location when `None`.
///
/// Never fails: a missing file gives defaults, an unreadable or invalid one
/// gives defaults plus a warning.
pub fn load_settings(path: Option<&Path>) -> Settings {
    let config_path = match path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(p) => p,
        None => {
            debug!("No config directory on this platform, using defaults");
            return Settings::default();
        }
    };

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_settings(Some(&dir.path().join("nope.toml")));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_full_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            r#"
[tunnel]
binary = "/usr/sbin/openvpn"
config_path = "/run/vpngate.ovpn"
stop_grace_ms = 500
require_root = false

[feed]
url = "http://localhost:8080/api"
country = "ALL"

[ui]
output_lines = 50
"#,
        )
        .unwrap();

        let settings = load_settings(Some(&path));
        assert_eq!(settings.tunnel.binary, "/usr/sbin/openvpn");
        assert_eq!(settings.tunnel.config_path, PathBuf::from("/run/vpngate.ovpn"));
        assert_eq!(settings.tunnel.stop_grace_ms, 500);
        assert!(!settings.tunnel.require_root);
        assert_eq!(settings.feed.url, "http://localhost:8080/api");
        assert_eq!(settings.feed.country, "ALL");
        assert_eq!(settings.ui.output_lines, 50);
    }

    #[test]
    fn test_load_invalid_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[tunnel\nbinary = ").unwrap();

        assert_eq!(load_settings(Some(&path)), Settings::default());
    }

    #[test]
    fn test_default_config_path_ends_with_app_dir() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("vpngate/config.toml"));
        }
    }
}
