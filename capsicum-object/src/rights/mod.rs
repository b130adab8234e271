//! Capability rights and their composition.
//!
//! A [`Right`] names a single permitted operation class; a [`RightsSet`]
//! packs any number of them into the multi-word mask the enforcement
//! boundary consumes. The secondary masks ([`FcntlRights`], ioctl command
//! lists) narrow sub-operations of `fcntl(2)` and `ioctl(2)` the same way
//! and live here too.

pub use self::{fcntl::*, ioctl::*, right::*, set::*};

mod fcntl;
mod ioctl;
mod right;
mod set;
