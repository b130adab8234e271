use {
    crate::{CapError, CapResult},
    core::{convert::TryFrom, fmt, str::FromStr},
    numeric_enum_macro::numeric_enum,
};

/// Canonical encoded value of a right: a one-hot word-index tag in bits
/// 57..=61 plus the rights bits themselves in bits 0..=56.
const fn capright(idx: u64, bit: u64) -> u64 {
    (1 << (57 + idx)) | bit
}

numeric_enum! {
    #[repr(u32)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    /// A single named capability right.
    ///
    /// The enumeration is closed: every member maps to exactly one
    /// canonical encoded value in the two-word capability space (see
    /// [`Right::bits`]), and both the names and the values are stable
    /// once shipped. Composite members (the `*AT` family, `SEEK`, the
    /// `MMAP_*` family, `KQUEUE`, `PREAD`/`PWRITE`) encode the bits of
    /// the operations they subsume.
    pub enum Right {
        Read = 0,
        Write = 1,
        Seek = 2,
        Accept = 3,
        AclCheck = 4,
        AclDelete = 5,
        AclGet = 6,
        AclSet = 7,
        Bind = 8,
        Bindat = 9,
        Chflagsat = 10,
        Connect = 11,
        Connectat = 12,
        Create = 13,
        Event = 14,
        ExtattrDelete = 15,
        ExtattrGet = 16,
        ExtattrList = 17,
        ExtattrSet = 18,
        Fchdir = 19,
        Fchflags = 20,
        Fchmod = 21,
        Fchmodat = 22,
        Fchown = 23,
        Fchownat = 24,
        Fchroot = 25,
        Fcntl = 26,
        Fexecve = 27,
        Flock = 28,
        Fpathconf = 29,
        Fsck = 30,
        Fstat = 31,
        Fstatat = 32,
        Fstatfs = 33,
        Fsync = 34,
        Ftruncate = 35,
        Futimes = 36,
        Futimesat = 37,
        Getpeername = 38,
        Getsockname = 39,
        Getsockopt = 40,
        InotifyAdd = 41,
        InotifyRm = 42,
        Ioctl = 43,
        Kqueue = 44,
        KqueueChange = 45,
        KqueueEvent = 46,
        LinkatSource = 47,
        LinkatTarget = 48,
        Listen = 49,
        Lookup = 50,
        MacGet = 51,
        MacSet = 52,
        Mkdirat = 53,
        Mkfifoat = 54,
        Mknodat = 55,
        Mmap = 56,
        MmapR = 57,
        MmapRw = 58,
        MmapRwx = 59,
        MmapRx = 60,
        MmapW = 61,
        MmapWx = 62,
        MmapX = 63,
        Pdgetpid = 64,
        Pdkill = 65,
        Peeloff = 66,
        Pread = 67,
        Pwrite = 68,
        SemGetvalue = 69,
        SemPost = 70,
        SemWait = 71,
        Setsockopt = 72,
        Shutdown = 73,
        Symlinkat = 74,
        Ttyhook = 75,
        Unlinkat = 76,
    }
}

impl Right {
    /// Number of defined rights.
    pub const COUNT: u32 = 77;

    /// The canonical encoded value of this right.
    ///
    /// Total over the enumeration; two distinct rights never share a
    /// value. Bit positions FreeBSD reserves for rights outside this
    /// enumeration (the renameat pair in word 0, `PDWAIT` in word 1) are
    /// never produced here and stay reserved.
    pub const fn bits(self) -> u64 {
        match self {
            Right::Read => capright(0, 0x0000_0000_0000_0001),
            Right::Write => capright(0, 0x0000_0000_0000_0002),
            // SEEK subsumes the tell-only bit 0x4.
            Right::Seek => capright(0, 0x0000_0000_0000_000c),
            Right::Accept => capright(0, 0x0000_0000_2000_0000),
            Right::AclCheck => capright(1, 0x0000_0000_0001_0000),
            Right::AclDelete => capright(1, 0x0000_0000_0002_0000),
            Right::AclGet => capright(1, 0x0000_0000_0004_0000),
            Right::AclSet => capright(1, 0x0000_0000_0008_0000),
            Right::Bind => capright(0, 0x0000_0000_4000_0000),
            Right::Bindat => Right::Lookup.bits() | 0x0000_0080_0000_0000,
            Right::Chflagsat => Right::Fchflags.bits() | Right::Lookup.bits(),
            Right::Connect => capright(0, 0x0000_0000_8000_0000),
            Right::Connectat => Right::Lookup.bits() | 0x0000_0100_0000_0000,
            Right::Create => capright(0, 0x0000_0000_0000_0040),
            Right::Event => capright(1, 0x0000_0000_0000_0020),
            Right::ExtattrDelete => capright(1, 0x0000_0000_0000_1000),
            Right::ExtattrGet => capright(1, 0x0000_0000_0000_2000),
            Right::ExtattrList => capright(1, 0x0000_0000_0000_4000),
            Right::ExtattrSet => capright(1, 0x0000_0000_0000_8000),
            Right::Fchdir => capright(0, 0x0000_0000_0000_0800),
            Right::Fchflags => capright(0, 0x0000_0000_0000_1000),
            Right::Fchmod => capright(0, 0x0000_0000_0000_2000),
            Right::Fchmodat => Right::Fchmod.bits() | Right::Lookup.bits(),
            Right::Fchown => capright(0, 0x0000_0000_0000_4000),
            Right::Fchownat => Right::Fchown.bits() | Right::Lookup.bits(),
            Right::Fchroot => capright(1, 0x0000_0000_0020_0000),
            Right::Fcntl => capright(0, 0x0000_0000_0000_8000),
            Right::Fexecve => capright(0, 0x0000_0000_0000_0080),
            Right::Flock => capright(0, 0x0000_0000_0001_0000),
            Right::Fpathconf => capright(0, 0x0000_0000_0002_0000),
            Right::Fsck => capright(0, 0x0000_0000_0004_0000),
            Right::Fstat => capright(0, 0x0000_0000_0008_0000),
            Right::Fstatat => Right::Fstat.bits() | Right::Lookup.bits(),
            Right::Fstatfs => capright(0, 0x0000_0000_0010_0000),
            Right::Fsync => capright(0, 0x0000_0000_0000_0100),
            Right::Ftruncate => capright(0, 0x0000_0000_0000_0200),
            Right::Futimes => capright(0, 0x0000_0000_0020_0000),
            Right::Futimesat => Right::Futimes.bits() | Right::Lookup.bits(),
            Right::Getpeername => capright(0, 0x0000_0001_0000_0000),
            Right::Getsockname => capright(0, 0x0000_0002_0000_0000),
            Right::Getsockopt => capright(0, 0x0000_0004_0000_0000),
            Right::InotifyAdd => capright(1, 0x0000_0000_0040_0000),
            Right::InotifyRm => capright(1, 0x0000_0000_0080_0000),
            Right::Ioctl => capright(1, 0x0000_0000_0000_0080),
            Right::Kqueue => Right::KqueueEvent.bits() | Right::KqueueChange.bits(),
            Right::KqueueChange => capright(1, 0x0000_0000_0010_0000),
            Right::KqueueEvent => capright(1, 0x0000_0000_0000_0040),
            Right::LinkatSource => Right::Lookup.bits() | 0x0000_0200_0000_0000,
            Right::LinkatTarget => Right::Lookup.bits() | 0x0000_0000_0040_0000,
            Right::Listen => capright(0, 0x0000_0008_0000_0000),
            Right::Lookup => capright(0, 0x0000_0000_0000_0400),
            Right::MacGet => capright(1, 0x0000_0000_0000_0001),
            Right::MacSet => capright(1, 0x0000_0000_0000_0002),
            Right::Mkdirat => Right::Lookup.bits() | 0x0000_0000_0080_0000,
            Right::Mkfifoat => Right::Lookup.bits() | 0x0000_0000_0100_0000,
            Right::Mknodat => Right::Lookup.bits() | 0x0000_0000_0200_0000,
            Right::Mmap => capright(0, 0x0000_0000_0000_0010),
            Right::MmapR => Right::Mmap.bits() | Right::Seek.bits() | Right::Read.bits(),
            Right::MmapRw => Right::MmapR.bits() | Right::MmapW.bits(),
            Right::MmapRwx => Right::MmapR.bits() | Right::MmapW.bits() | Right::MmapX.bits(),
            Right::MmapRx => Right::MmapR.bits() | Right::MmapX.bits(),
            Right::MmapW => Right::Mmap.bits() | Right::Seek.bits() | Right::Write.bits(),
            Right::MmapWx => Right::MmapW.bits() | Right::MmapX.bits(),
            Right::MmapX => Right::Mmap.bits() | Right::Seek.bits() | 0x0000_0000_0000_0020,
            Right::Pdgetpid => capright(1, 0x0000_0000_0000_0200),
            Right::Pdkill => capright(1, 0x0000_0000_0000_0800),
            Right::Peeloff => capright(0, 0x0000_0010_0000_0000),
            Right::Pread => Right::Seek.bits() | Right::Read.bits(),
            Right::Pwrite => Right::Seek.bits() | Right::Write.bits(),
            Right::SemGetvalue => capright(1, 0x0000_0000_0000_0004),
            Right::SemPost => capright(1, 0x0000_0000_0000_0008),
            Right::SemWait => capright(1, 0x0000_0000_0000_0010),
            Right::Setsockopt => capright(0, 0x0000_0020_0000_0000),
            Right::Shutdown => capright(0, 0x0000_0040_0000_0000),
            Right::Symlinkat => Right::Lookup.bits() | 0x0000_0000_0800_0000,
            Right::Ttyhook => capright(1, 0x0000_0000_0000_0100),
            Right::Unlinkat => Right::Lookup.bits() | 0x0000_0000_1000_0000,
        }
    }

    /// The stable lowercase name external policy refers to this right by.
    pub const fn name(self) -> &'static str {
        match self {
            Right::Read => "read",
            Right::Write => "write",
            Right::Seek => "seek",
            Right::Accept => "accept",
            Right::AclCheck => "acl_check",
            Right::AclDelete => "acl_delete",
            Right::AclGet => "acl_get",
            Right::AclSet => "acl_set",
            Right::Bind => "bind",
            Right::Bindat => "bindat",
            Right::Chflagsat => "chflagsat",
            Right::Connect => "connect",
            Right::Connectat => "connectat",
            Right::Create => "create",
            Right::Event => "event",
            Right::ExtattrDelete => "extattr_delete",
            Right::ExtattrGet => "extattr_get",
            Right::ExtattrList => "extattr_list",
            Right::ExtattrSet => "extattr_set",
            Right::Fchdir => "fchdir",
            Right::Fchflags => "fchflags",
            Right::Fchmod => "fchmod",
            Right::Fchmodat => "fchmodat",
            Right::Fchown => "fchown",
            Right::Fchownat => "fchownat",
            Right::Fchroot => "fchroot",
            Right::Fcntl => "fcntl",
            Right::Fexecve => "fexecve",
            Right::Flock => "flock",
            Right::Fpathconf => "fpathconf",
            Right::Fsck => "fsck",
            Right::Fstat => "fstat",
            Right::Fstatat => "fstatat",
            Right::Fstatfs => "fstatfs",
            Right::Fsync => "fsync",
            Right::Ftruncate => "ftruncate",
            Right::Futimes => "futimes",
            Right::Futimesat => "futimesat",
            Right::Getpeername => "getpeername",
            Right::Getsockname => "getsockname",
            Right::Getsockopt => "getsockopt",
            Right::InotifyAdd => "inotify_add",
            Right::InotifyRm => "inotify_rm",
            Right::Ioctl => "ioctl",
            Right::Kqueue => "kqueue",
            Right::KqueueChange => "kqueue_change",
            Right::KqueueEvent => "kqueue_event",
            Right::LinkatSource => "linkat_source",
            Right::LinkatTarget => "linkat_target",
            Right::Listen => "listen",
            Right::Lookup => "lookup",
            Right::MacGet => "mac_get",
            Right::MacSet => "mac_set",
            Right::Mkdirat => "mkdirat",
            Right::Mkfifoat => "mkfifoat",
            Right::Mknodat => "mknodat",
            Right::Mmap => "mmap",
            Right::MmapR => "mmap_r",
            Right::MmapRw => "mmap_rw",
            Right::MmapRwx => "mmap_rwx",
            Right::MmapRx => "mmap_rx",
            Right::MmapW => "mmap_w",
            Right::MmapWx => "mmap_wx",
            Right::MmapX => "mmap_x",
            Right::Pdgetpid => "pdgetpid",
            Right::Pdkill => "pdkill",
            Right::Peeloff => "peeloff",
            Right::Pread => "pread",
            Right::Pwrite => "pwrite",
            Right::SemGetvalue => "sem_getvalue",
            Right::SemPost => "sem_post",
            Right::SemWait => "sem_wait",
            Right::Setsockopt => "setsockopt",
            Right::Shutdown => "shutdown",
            Right::Symlinkat => "symlinkat",
            Right::Ttyhook => "ttyhook",
            Right::Unlinkat => "unlinkat",
        }
    }

    /// Recover a right from its ordinal representation.
    ///
    /// The recoverable arm for values arriving from outside the closed
    /// enumeration (a cast, a wire ordinal).
    pub fn from_index(index: u32) -> CapResult<Self> {
        Right::try_from(index).map_err(|_| {
            warn!("right: invalid ordinal {}", index);
            CapError::EINVAL
        })
    }

    /// Iterate over every defined right in ordinal order.
    pub fn iter() -> impl Iterator<Item = Right> {
        (0..Self::COUNT).filter_map(|v| Right::try_from(v).ok())
    }
}

impl FromStr for Right {
    type Err = CapError;

    /// The deserialization boundary for policy configuration referring to
    /// rights by name.
    fn from_str(s: &str) -> CapResult<Self> {
        Right::iter().find(|r| r.name() == s).ok_or_else(|| {
            warn!("right: unknown name {:?}", s);
            CapError::EINVAL
        })
    }
}

impl fmt::Display for Right {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}
