//! Capsicum error codes
use core::fmt;

/// The type returned by rights-limit operations.
pub type CapResult<T = ()> = Result<T, CapError>;

/// Errno values the Capsicum syscalls produce.
///
/// Boundary refusals are security relevant and propagate unchanged to the
/// caller; nothing in this crate retries or downgrades them.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapError {
    /// Operation not permitted.
    EPERM = 1,
    /// Bad file descriptor.
    EBADF = 9,
    /// Cannot allocate memory.
    ENOMEM = 12,
    /// Bad address.
    EFAULT = 14,
    /// Invalid argument.
    EINVAL = 22,
    /// The running kernel has no Capsicum support.
    ENOSYS = 78,
    /// The requested limit would widen the currently held rights.
    ENOTCAPABLE = 93,
    /// The operation is not permitted in capability mode.
    ECAPMODE = 94,
}

impl CapError {
    /// The raw errno value.
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Map an errno reported by the enforcement boundary.
    ///
    /// Values outside the documented Capsicum set are reported and mapped
    /// to `EINVAL`.
    pub fn from_errno(errno: i32) -> Self {
        match errno {
            1 => CapError::EPERM,
            9 => CapError::EBADF,
            12 => CapError::ENOMEM,
            14 => CapError::EFAULT,
            22 => CapError::EINVAL,
            78 => CapError::ENOSYS,
            93 => CapError::ENOTCAPABLE,
            94 => CapError::ECAPMODE,
            _ => {
                warn!("cap error: unexpected errno {}", errno);
                CapError::EINVAL
            }
        }
    }
}

impl fmt::Display for CapError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::CapError::*;
        let explain = match self {
            EPERM => "Operation not permitted",
            EBADF => "Bad file descriptor",
            ENOMEM => "Cannot allocate memory",
            EFAULT => "Bad address",
            EINVAL => "Invalid argument",
            ENOSYS => "Function not implemented",
            ENOTCAPABLE => "Capabilities insufficient",
            ECAPMODE => "Not permitted in capability mode",
        };
        write!(f, "{}", explain)
    }
}
