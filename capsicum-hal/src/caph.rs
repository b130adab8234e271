//! Stream-limit helpers.
//!
//! Convenience layer over the raw limit calls for the common case of a
//! stdio-like stream: one call installs the canonical stream rights and
//! narrows the descriptor's ioctls and fcntls to what a terminal-aware
//! program still needs.

use {
    super::{fcntls_limit, ioctls_limit, rights_limit, RawFd},
    bitflags::bitflags,
    capsicum_object::{
        rights::{FcntlRights, IoctlCommand, Right, RightsSet},
        CapError, CapResult,
    },
};

pub const STDIN_FILENO: RawFd = 0;
pub const STDOUT_FILENO: RawFd = 1;
pub const STDERR_FILENO: RawFd = 2;

/// `TIOCGETA`: read terminal attributes.
pub const TIOCGETA: IoctlCommand = IoctlCommand::new(0x402c_7413);
/// `TIOCGWINSZ`: read the terminal window size.
pub const TIOCGWINSZ: IoctlCommand = IoctlCommand::new(0x4008_7468);
/// `FIODTYPE`: read the descriptor's device type.
pub const FIODTYPE: IoctlCommand = IoctlCommand::new(0x4004_667a);

/// The ioctls a limited stream keeps.
const STREAM_IOCTLS: [IoctlCommand; 3] = [TIOCGETA, TIOCGWINSZ, FIODTYPE];

bitflags! {
    /// How a stream descriptor may still be used after limiting.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StreamLimitOptions: u32 {
        /// Tolerate a closed descriptor instead of failing with `EBADF`.
        const IGNORE_EBADF = 0x01;
        /// Keep the stream readable.
        const READ = 0x02;
        /// Keep the stream writable.
        const WRITE = 0x04;
    }
}

/// Narrow `fd` to stream use: EVENT, FCNTL, FSTAT, IOCTL and SEEK plus
/// READ/WRITE as requested, then limit ioctls to the terminal trio and
/// fcntls to `GETFL | SETFL`.
///
/// A kernel without Capsicum (`ENOSYS`) leaves the descriptor untouched
/// and reports success, so callers sandbox opportunistically.
pub fn limit_stream(fd: RawFd, options: StreamLimitOptions) -> CapResult {
    let mut rights: RightsSet = [
        Right::Event,
        Right::Fcntl,
        Right::Fstat,
        Right::Ioctl,
        Right::Seek,
    ]
    .iter()
    .copied()
    .collect();
    if options.contains(StreamLimitOptions::READ) {
        rights.set(Right::Read);
    }
    if options.contains(StreamLimitOptions::WRITE) {
        rights.set(Right::Write);
    }

    match rights_limit(fd, &rights) {
        Ok(()) => {}
        Err(CapError::ENOSYS) => return Ok(()),
        Err(CapError::EBADF) if options.contains(StreamLimitOptions::IGNORE_EBADF) => {
            return Ok(())
        }
        Err(e) => return Err(e),
    }

    match ioctls_limit(fd, &STREAM_IOCTLS) {
        Ok(()) => {}
        Err(CapError::ENOSYS) => return Ok(()),
        Err(e) => return Err(e),
    }

    match fcntls_limit(fd, FcntlRights::GETFL | FcntlRights::SETFL) {
        Ok(()) | Err(CapError::ENOSYS) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Limit stdin to a readable stream.
pub fn limit_stdin() -> CapResult {
    limit_stream(STDIN_FILENO, StreamLimitOptions::READ)
}

/// Limit stdout to a writable stream.
pub fn limit_stdout() -> CapResult {
    limit_stream(STDOUT_FILENO, StreamLimitOptions::WRITE)
}

/// Limit stderr to a writable stream, tolerating it being closed.
pub fn limit_stderr() -> CapResult {
    limit_stream(
        STDERR_FILENO,
        StreamLimitOptions::WRITE | StreamLimitOptions::IGNORE_EBADF,
    )
}

/// Limit all three standard streams.
pub fn limit_stdio() -> CapResult {
    limit_stdin()?;
    limit_stdout()?;
    limit_stderr()
}
