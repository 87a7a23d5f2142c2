//! Privilege check performed before any tunnel work
//!
//! OpenVPN needs to create a tun device and rewrite routes, which requires
//! root. The check is a trait so the controller can be exercised without
//! running the test suite as root.

use std::fmt::Debug;

/// Answers whether the current process may start a tunnel
pub trait PrivilegeProbe: Debug + Send + Sync {
    fn is_elevated(&self) -> bool;
}

/// Checks the effective user id
#[derive(Debug, Clone, Copy, Default)]
pub struct EffectiveUid;

impl PrivilegeProbe for EffectiveUid {
    #[cfg(unix)]
    fn is_elevated(&self) -> bool {
        // SAFETY: geteuid has no preconditions and cannot fail
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    fn is_elevated(&self) -> bool {
        true
    }
}

/// Fixed answer, used when `require_root` is disabled
#[derive(Debug, Clone, Copy)]
pub struct Fixed(pub bool);

impl PrivilegeProbe for Fixed {
    fn is_elevated(&self) -> bool {
        self.0
    }
}
