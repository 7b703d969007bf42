//! Narrow replacements for host services that do not exist on the board.
//!
//! Each module stands in for one operating-system facility: either by degrading it to
//! something that still works without an OS (memory mapping becomes a plain read, the
//! local time zone is always UTC) or by reporting it as unsupported.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![deny(missing_debug_implementations)]

extern crate alloc;

pub mod exec;
#[cfg(feature = "std")]
pub mod mmap;
pub mod nonblock;
pub mod osinfo;
pub mod root;
pub mod signal;
pub mod syscall;
pub mod zoneinfo;
