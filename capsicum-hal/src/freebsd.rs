//! The native enforcement boundary: FreeBSD's Capsicum syscalls.
//!
//! Thin unsafe wrappers only — every security decision is the kernel's.
//! Refusals come back as errnos and propagate unchanged.

use {
    super::RawFd,
    alloc::vec::Vec,
    capsicum_object::{
        rights::{FcntlRights, IoctlCommand, IoctlLimit, RightsSet, MAX_IOCTL_CMDS, RIGHTS_WORDS},
        CapError, CapResult,
    },
    libc::{c_int, c_uint, c_ulong},
};

/// `cap_rights_t` as the libc headers lay it out.
#[repr(C)]
struct CapRightsT {
    cr_rights: [u64; RIGHTS_WORDS],
}

extern "C" {
    fn cap_rights_limit(fd: c_int, rights: *const CapRightsT) -> c_int;
    fn cap_ioctls_limit(fd: c_int, cmds: *const c_ulong, ncmds: usize) -> c_int;
    fn cap_ioctls_get(fd: c_int, cmds: *mut c_ulong, maxcmds: usize) -> isize;
    fn cap_fcntls_limit(fd: c_int, fcntlrights: u32) -> c_int;
    fn cap_fcntls_get(fd: c_int, fcntlrightsp: *mut u32) -> c_int;
    fn cap_enter() -> c_int;
    fn cap_getmode(modep: *mut c_uint) -> c_int;
}

/// `cap_ioctls_get` returns this when the descriptor was never limited.
const CAP_IOCTLS_ALL: isize = isize::MAX;

fn errno() -> i32 {
    unsafe { *libc::__error() }
}

pub(crate) fn rights_limit(fd: RawFd, rights: &RightsSet) -> CapResult {
    let raw = CapRightsT {
        cr_rights: rights.as_raw(),
    };
    match unsafe { cap_rights_limit(fd, &raw) } {
        0 => Ok(()),
        _ => Err(CapError::from_errno(errno())),
    }
}

pub(crate) fn ioctls_limit(fd: RawFd, cmds: &[IoctlCommand]) -> CapResult {
    let raw: Vec<c_ulong> = cmds.iter().map(|cmd| cmd.raw() as c_ulong).collect();
    match unsafe { cap_ioctls_limit(fd, raw.as_ptr(), raw.len()) } {
        0 => Ok(()),
        _ => Err(CapError::from_errno(errno())),
    }
}

pub(crate) fn ioctls_get(fd: RawFd) -> CapResult<IoctlLimit> {
    let mut buf = [0 as c_ulong; MAX_IOCTL_CMDS];
    let res = unsafe { cap_ioctls_get(fd, buf.as_mut_ptr(), buf.len()) };
    if res < 0 {
        return Err(CapError::from_errno(errno()));
    }
    if res == CAP_IOCTLS_ALL {
        return Ok(IoctlLimit::Unlimited);
    }
    let count = (res as usize).min(buf.len());
    Ok(IoctlLimit::Limited(
        buf[..count]
            .iter()
            .map(|&cmd| IoctlCommand::new(cmd as u64))
            .collect(),
    ))
}

pub(crate) fn fcntls_limit(fd: RawFd, rights: FcntlRights) -> CapResult {
    match unsafe { cap_fcntls_limit(fd, rights.bits()) } {
        0 => Ok(()),
        _ => Err(CapError::from_errno(errno())),
    }
}

pub(crate) fn fcntls_get(fd: RawFd) -> CapResult<FcntlRights> {
    let mut mask: u32 = 0;
    match unsafe { cap_fcntls_get(fd, &mut mask) } {
        // The kernel only hands back bits it was given, so truncation
        // never drops a granted sub-right.
        0 => Ok(FcntlRights::from_bits_truncate(mask)),
        _ => Err(CapError::from_errno(errno())),
    }
}

pub(crate) fn enter() -> CapResult {
    match unsafe { cap_enter() } {
        0 => Ok(()),
        _ => Err(CapError::from_errno(errno())),
    }
}

pub(crate) fn get_mode() -> CapResult<bool> {
    let mut mode: c_uint = 0;
    match unsafe { cap_getmode(&mut mode) } {
        0 => Ok(mode != 0),
        _ => Err(CapError::from_errno(errno())),
    }
}
