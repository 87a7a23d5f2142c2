//! Application error types with rich context

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ─────────────────────────────────────────────────────────────
    // Terminal/TUI Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Terminal error: {message}")]
    Terminal { message: String },

    #[error("Failed to initialize terminal: {0}")]
    TerminalInit(String),

    #[error("Failed to restore terminal: {0}")]
    TerminalRestore(String),

    // ─────────────────────────────────────────────────────────────
    // Tunnel Errors
    // ─────────────────────────────────────────────────────────────
    #[error("root privileges required to start a tunnel")]
    PrivilegeRequired,

    #[error("Invalid tunnel configuration payload: {reason}")]
    ConfigDecode { reason: String },

    #[error("Tunnel binary not found: {binary}. Ensure it is installed and in your PATH.")]
    TunnelNotFound { binary: String },

    #[error("Failed to spawn tunnel process: {reason}")]
    ProcessSpawn { reason: String },

    #[error("Connection is shut down; not starting a tunnel to {ip}")]
    ShutDown { ip: String },

    // ─────────────────────────────────────────────────────────────
    // Feed Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to fetch server list: {message}")]
    Feed { message: String },

    #[error("Malformed server list: {message}")]
    FeedParse { message: String },

    #[error("No servers found for country: {country}")]
    NoServers { country: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn terminal(message: impl Into<String>) -> Self {
        Self::Terminal {
            message: message.into(),
        }
    }

    pub fn config_decode(reason: impl Into<String>) -> Self {
        Self::ConfigDecode {
            reason: reason.into(),
        }
    }

    pub fn tunnel_not_found(binary: impl Into<String>) -> Self {
        Self::TunnelNotFound {
            binary: binary.into(),
        }
    }

    pub fn process_spawn(reason: impl Into<String>) -> Self {
        Self::ProcessSpawn {
            reason: reason.into(),
        }
    }

    pub fn feed(message: impl Into<String>) -> Self {
        Self::Feed {
            message: message.into(),
        }
    }

    pub fn feed_parse(message: impl Into<String>) -> Self {
        Self::FeedParse {
            message: message.into(),
        }
    }

    pub fn no_servers(country: impl Into<String>) -> Self {
        Self::NoServers {
            country: country.into(),
        }
    }

    /// Check if this is a recoverable error.
    ///
    /// Recoverable errors are reported in the output pane and leave the
    /// application running.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Io(_)
                | Error::PrivilegeRequired
                | Error::ConfigDecode { .. }
                | Error::TunnelNotFound { .. }
                | Error::ProcessSpawn { .. }
                | Error::ShutDown { .. }
        )
    }

    /// Check if this error should trigger application exit
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Terminal { .. }
                | Error::TerminalInit(_)
                | Error::TerminalRestore(_)
                | Error::Feed { .. }
                | Error::FeedParse { .. }
                | Error::NoServers { .. }
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::PrivilegeRequired;
        assert_eq!(err.to_string(), "root privileges required to start a tunnel");

        let err = Error::tunnel_not_found("openvpn");
        assert!(err.to_string().contains("openvpn"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_tunnel_errors_are_recoverable() {
        assert!(Error::PrivilegeRequired.is_recoverable());
        assert!(Error::config_decode("bad padding").is_recoverable());
        assert!(Error::tunnel_not_found("openvpn").is_recoverable());
        assert!(Error::process_spawn("permission denied").is_recoverable());
        assert!(!Error::PrivilegeRequired.is_fatal());
        assert!(Error::ShutDown { ip: "1.1.1.1".into() }.is_recoverable());
    }

    #[test]
    fn test_terminal_errors_are_fatal() {
        assert!(Error::terminal("draw failed").is_fatal());
        assert!(Error::TerminalInit("no tty".into()).is_fatal());
        assert!(!Error::terminal("draw failed").is_recoverable());
    }

    #[test]
    fn test_feed_errors_are_fatal() {
        assert!(Error::feed("connection refused").is_fatal());
        assert!(Error::feed_parse("missing header").is_fatal());
        let err = Error::no_servers("JP");
        assert!(err.is_fatal());
        assert!(err.to_string().contains("JP"));
    }

    #[test]
    fn test_result_ext_context_preserves_error() {
        let io: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let result = io.context("writing tunnel config");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
