//! Enforcement-boundary layer for Capsicum rights limits.
//!
//! One call surface, two backends: on FreeBSD (with the `mock` feature
//! off) every function is a thin wrapper over the corresponding Capsicum
//! syscall; everywhere else a hosted model of the kernel's
//! per-descriptor state stands in, enforcing the same monotonic
//! narrowing so the rest of the stack behaves identically under test.
//!
//! Once a limit is installed the boundary only ever narrows it further;
//! this layer never caches or mirrors the kernel-held mask, it only
//! submits the next requested one.

#![no_std]
#![deny(warnings)]

extern crate alloc;

#[macro_use]
extern crate log;

#[cfg(test)]
#[macro_use]
extern crate std;

use capsicum_object::{
    rights::{FcntlRights, IoctlCommand, IoctlLimit, RightsSet, MAX_IOCTL_CMDS},
    CapError, CapResult,
};

/// A raw file descriptor.
pub type RawFd = i32;

cfg_if::cfg_if! {
    if #[cfg(all(target_os = "freebsd", not(feature = "mock")))] {
        mod freebsd;
        use freebsd as backend;
    } else {
        mod mock;
        use mock as backend;
        pub use mock::{close_fd, installed_rights, register_fd};
    }
}

mod caph;
pub use caph::*;

/// Install `rights` as the descriptor's new permitted-operations ceiling.
///
/// The set is checked locally first so a malformed mask fails fast with a
/// precise `EINVAL` instead of the boundary's opaque rejection. The
/// boundary refuses any request that would widen the currently installed
/// mask (`ENOTCAPABLE`), leaving it untouched.
pub fn rights_limit(fd: RawFd, rights: &RightsSet) -> CapResult {
    info!("rights.limit: fd={}, rights={:?}", fd, rights);
    if !rights.is_valid() {
        return Err(CapError::EINVAL);
    }
    backend::rights_limit(fd, rights)
}

/// Limit the descriptor to exactly the given ioctl commands.
///
/// Lists longer than [`MAX_IOCTL_CMDS`] are rejected up front; the
/// boundary refuses a list permitting any command the current ceiling
/// does not.
pub fn ioctls_limit(fd: RawFd, cmds: &[IoctlCommand]) -> CapResult {
    info!("ioctls.limit: fd={}, ncmds={}", fd, cmds.len());
    if cmds.len() > MAX_IOCTL_CMDS {
        return Err(CapError::EINVAL);
    }
    backend::ioctls_limit(fd, cmds)
}

/// The ioctl ceiling currently installed on the descriptor.
///
/// Distinguishes the never-limited state ([`IoctlLimit::Unlimited`])
/// from a limit of zero commands.
pub fn ioctls_get(fd: RawFd) -> CapResult<IoctlLimit> {
    info!("ioctls.get: fd={}", fd);
    backend::ioctls_get(fd)
}

/// Limit the descriptor's permitted `fcntl(2)` sub-operations.
pub fn fcntls_limit(fd: RawFd, rights: FcntlRights) -> CapResult {
    info!("fcntls.limit: fd={}, rights={:?}", fd, rights);
    backend::fcntls_limit(fd, rights)
}

/// The `fcntl(2)` mask currently installed on the descriptor.
pub fn fcntls_get(fd: RawFd) -> CapResult<FcntlRights> {
    info!("fcntls.get: fd={}", fd);
    backend::fcntls_get(fd)
}

/// Enter capability mode for the whole process. Irreversible.
pub fn enter() -> CapResult {
    info!("cap.enter");
    backend::enter()
}

/// Whether the process is in capability mode.
pub fn get_mode() -> CapResult<bool> {
    backend::get_mode()
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use capsicum_object::rights::Right;

    fn rights(rs: &[Right]) -> RightsSet {
        rs.iter().copied().collect()
    }

    // Tests drive the hosted mock; each uses its own descriptor numbers
    // so they can run concurrently against the process-wide table.

    #[test]
    fn unknown_descriptor_is_ebadf() {
        assert_eq!(
            rights_limit(100, &rights(&[Right::Read])),
            Err(CapError::EBADF)
        );
        assert_eq!(ioctls_get(100), Err(CapError::EBADF));
        assert_eq!(fcntls_get(100), Err(CapError::EBADF));
    }

    #[test]
    fn limit_then_widen_is_refused_and_state_kept() {
        register_fd(101);
        rights_limit(101, &rights(&[Right::Read, Right::Write])).unwrap();

        // A strict superset of the installed mask must be refused...
        assert_eq!(
            rights_limit(101, &rights(&[Right::Read, Right::Write, Right::Seek])),
            Err(CapError::ENOTCAPABLE)
        );
        // ...without touching the installed mask.
        assert_eq!(installed_rights(101), Ok(rights(&[Right::Read, Right::Write])));
        assert_eq!(
            rights_limit(101, &rights(&[Right::Read, Right::Seek])),
            Err(CapError::ENOTCAPABLE)
        );

        // Narrowing further still works.
        rights_limit(101, &rights(&[Right::Read])).unwrap();
        assert_eq!(installed_rights(101), Ok(rights(&[Right::Read])));
    }

    #[test]
    fn composite_rights_narrow_to_their_parts() {
        register_fd(102);
        rights_limit(102, &rights(&[Right::Pread])).unwrap();
        // PREAD subsumes READ and SEEK, so both still pass.
        rights_limit(102, &rights(&[Right::Read, Right::Seek])).unwrap();
        // WRITE was never part of the mask.
        assert_eq!(
            rights_limit(102, &rights(&[Right::Write])),
            Err(CapError::ENOTCAPABLE)
        );
    }

    #[test]
    fn empty_ioctl_list_differs_from_unlimited() {
        register_fd(103);
        assert_eq!(ioctls_get(103), Ok(IoctlLimit::Unlimited));

        ioctls_limit(103, &[]).unwrap();
        assert_eq!(ioctls_get(103), Ok(IoctlLimit::Limited(vec![])));
    }

    #[test]
    fn ioctl_limits_only_narrow() {
        let tiocgwinsz = IoctlCommand::new(0x4008_7468);
        let fionread = IoctlCommand::new(0x4004_667f);

        register_fd(104);
        ioctls_limit(104, &[tiocgwinsz]).unwrap();
        assert_eq!(
            ioctls_limit(104, &[tiocgwinsz, fionread]),
            Err(CapError::ENOTCAPABLE)
        );
        assert_eq!(ioctls_get(104), Ok(IoctlLimit::Limited(vec![tiocgwinsz])));
    }

    #[test]
    fn oversized_ioctl_list_is_rejected() {
        register_fd(105);
        let cmds = vec![IoctlCommand::new(1); MAX_IOCTL_CMDS + 1];
        assert_eq!(ioctls_limit(105, &cmds), Err(CapError::EINVAL));
        assert_eq!(ioctls_get(105), Ok(IoctlLimit::Unlimited));
    }

    #[test]
    fn fcntl_limits_only_narrow() {
        register_fd(106);
        assert_eq!(fcntls_get(106), Ok(FcntlRights::ALL));

        fcntls_limit(106, FcntlRights::GETFL | FcntlRights::SETFL).unwrap();
        assert_eq!(
            fcntls_limit(106, FcntlRights::GETOWN),
            Err(CapError::ENOTCAPABLE)
        );
        assert_eq!(fcntls_get(106), Ok(FcntlRights::GETFL | FcntlRights::SETFL));

        fcntls_limit(106, FcntlRights::GETFL).unwrap();
        assert_eq!(fcntls_get(106), Ok(FcntlRights::GETFL));
    }

    #[test]
    fn closing_forgets_the_descriptor() {
        register_fd(107);
        rights_limit(107, &rights(&[Right::Read])).unwrap();
        close_fd(107);
        assert_eq!(installed_rights(107), Err(CapError::EBADF));
    }

    #[test]
    fn re_registering_does_not_widen() {
        register_fd(108);
        rights_limit(108, &rights(&[Right::Read])).unwrap();
        register_fd(108);
        assert_eq!(installed_rights(108), Ok(rights(&[Right::Read])));
    }

    #[test]
    fn capability_mode_round_trip() {
        assert!(!get_mode().unwrap());
        enter().unwrap();
        assert!(get_mode().unwrap());
    }
}
