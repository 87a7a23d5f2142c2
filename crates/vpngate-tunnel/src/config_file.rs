//! Scoped scratch file holding the decoded tunnel configuration
//!
//! One [`ConfigFile`] is acquired at startup and lives as long as the
//! connection controller. Each connect overwrites it; dropping the guard
//! removes it, which covers normal quit, error returns and panic unwinding.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use base64::Engine;
use vpngate_core::prelude::*;

/// Well-known location used by the tunnel binary
pub const DEFAULT_CONFIG_PATH: &str = "/tmp/openvpnconf";

/// Decode a base64 configuration payload (standard alphabet, padded).
///
/// Surrounding whitespace is ignored; anything else invalid is a
/// [`Error::ConfigDecode`].
pub fn decode_payload(payload: &str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| Error::config_decode(e.to_string()))
}

/// Guard over the single tunnel configuration file
#[derive(Debug)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    /// Take ownership of `path`. Nothing is written until [`ConfigFile::write`].
    pub fn acquire(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        debug!("Acquired tunnel config path {}", path.display());
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Replace the file contents. The data is flushed to disk before this
    /// returns so the tunnel process never reads a partial file.
    ///
    /// Whatever sits at the path is unlinked first and the file is created
    /// fresh, so a symlink planted there is never followed.
    pub fn write(&self, contents: &[u8]) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to replace {}", self.path.display()))
            }
        }

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            // The payload carries key material
            options.mode(0o600).custom_flags(libc::O_NOFOLLOW);
        }

        let mut file = options
            .open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        file.write_all(contents)?;
        file.sync_all()?;

        debug!(
            "Wrote {} bytes of tunnel config to {}",
            contents.len(),
            self.path.display()
        );
        Ok(())
    }
}

impl Drop for ConfigFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => info!("Removed tunnel config {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove {}: {}", self.path.display(), e),
        }
    }
}
