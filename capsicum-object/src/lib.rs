//! Capsicum capability-rights objects
//!
//! The data model shared by everything that talks to the Capsicum
//! enforcement boundary: the closed [`Right`] enumeration and its
//! canonical bit encoding, the [`RightsSet`] algebra, and the secondary
//! ioctl/fcntl masks.
//!
//! [`Right`]: rights::Right
//! [`RightsSet`]: rights::RightsSet

#![no_std]
#![deny(warnings)]

extern crate alloc;

#[macro_use]
extern crate log;

#[cfg(test)]
#[macro_use]
extern crate std;

mod error;
pub mod rights;

pub use self::error::*;
