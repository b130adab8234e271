//! Hosted model of the kernel's per-descriptor capability state.
//!
//! Stands in for the real enforcement boundary on non-FreeBSD hosts and
//! under test: a process-wide descriptor table whose entries start
//! unrestricted and can only ever be narrowed, exactly like the
//! kernel-held masks. Nothing here is consulted by the native backend.

use {
    super::RawFd,
    capsicum_object::{
        rights::{FcntlRights, IoctlCommand, IoctlLimit, RightsSet},
        CapError, CapResult,
    },
    core::sync::atomic::{AtomicBool, Ordering},
    hashbrown::HashMap,
    lazy_static::lazy_static,
    spin::Mutex,
};

/// The modelled state of one open descriptor.
struct Descriptor {
    rights: RightsSet,
    ioctls: IoctlLimit,
    fcntls: FcntlRights,
}

impl Default for Descriptor {
    fn default() -> Self {
        // A fresh descriptor is unrestricted on every axis.
        Descriptor {
            rights: RightsSet::all(),
            ioctls: IoctlLimit::Unlimited,
            fcntls: FcntlRights::ALL,
        }
    }
}

lazy_static! {
    static ref TABLE: Mutex<HashMap<RawFd, Descriptor>> = Mutex::new(HashMap::new());
}

static CAP_MODE: AtomicBool = AtomicBool::new(false);

/// Create an unrestricted entry for `fd` in the model table.
///
/// Idempotent: re-registering an already-known descriptor keeps its
/// installed limits (a model descriptor can never regain rights).
pub fn register_fd(fd: RawFd) {
    TABLE.lock().entry(fd).or_insert_with(Descriptor::default);
}

/// Drop `fd` from the model table.
pub fn close_fd(fd: RawFd) {
    TABLE.lock().remove(&fd);
}

/// Read back the rights mask the model holds for `fd`.
///
/// Inspection of the hosted model only; the real boundary exposes no
/// equivalent and this crate never mirrors kernel state.
pub fn installed_rights(fd: RawFd) -> CapResult<RightsSet> {
    let table = TABLE.lock();
    table.get(&fd).map(|d| d.rights).ok_or(CapError::EBADF)
}

pub(crate) fn rights_limit(fd: RawFd, rights: &RightsSet) -> CapResult {
    let mut table = TABLE.lock();
    let desc = table.get_mut(&fd).ok_or(CapError::EBADF)?;
    if !desc.rights.contains(rights) {
        return Err(CapError::ENOTCAPABLE);
    }
    desc.rights = *rights;
    Ok(())
}

pub(crate) fn ioctls_limit(fd: RawFd, cmds: &[IoctlCommand]) -> CapResult {
    let mut table = TABLE.lock();
    let desc = table.get_mut(&fd).ok_or(CapError::EBADF)?;
    let requested = IoctlLimit::Limited(cmds.to_vec());
    if !requested.narrows(&desc.ioctls) {
        return Err(CapError::ENOTCAPABLE);
    }
    desc.ioctls = requested;
    Ok(())
}

pub(crate) fn ioctls_get(fd: RawFd) -> CapResult<IoctlLimit> {
    let table = TABLE.lock();
    table.get(&fd).map(|d| d.ioctls.clone()).ok_or(CapError::EBADF)
}

pub(crate) fn fcntls_limit(fd: RawFd, rights: FcntlRights) -> CapResult {
    let mut table = TABLE.lock();
    let desc = table.get_mut(&fd).ok_or(CapError::EBADF)?;
    if !desc.fcntls.contains(rights) {
        return Err(CapError::ENOTCAPABLE);
    }
    desc.fcntls = rights;
    Ok(())
}

pub(crate) fn fcntls_get(fd: RawFd) -> CapResult<FcntlRights> {
    let table = TABLE.lock();
    table.get(&fd).map(|d| d.fcntls).ok_or(CapError::EBADF)
}

pub(crate) fn enter() -> CapResult {
    CAP_MODE.store(true, Ordering::SeqCst);
    Ok(())
}

pub(crate) fn get_mode() -> CapResult<bool> {
    Ok(CAP_MODE.load(Ordering::SeqCst))
}
