//! Events emitted by the tunnel worker

use std::fmt;

/// Identifies one spawned tunnel process.
///
/// Every connect gets a fresh id so a late exit notification from a
/// superseded process can be told apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Events from the tunnel process worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TunnelEvent {
    /// The process has exited and been reaped
    Exited {
        session: SessionId,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
        /// `true` when the exit followed a stop request
        requested: bool,
    },
}
