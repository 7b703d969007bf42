//! zkboard is a bare-metal board-support layer for running programs on a RISC-V zkVM
//! following the [ZisK](https://github.com/0xPolygonHermez/zisk) memory map.
//!
//! There is no operating system underneath: the board layer gives the program a fixed memory
//! layout, a byte console, a deterministic clock, a deterministic "random" source and a way to
//! halt the machine. Everything is deterministic, as required for proof generation.
//!
//! The hook surface consumed by the program lives in [`hooks`] and is only compiled for
//! `target_os = "none"`. Everything else builds on the host too, where it is tested against
//! buffer-backed memory.

// We are building for a freestanding target, so no standard library support for us
#![cfg_attr(not(test), no_std)]
// Keep things clean and tidy
#![warn(missing_docs)]
#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![deny(missing_debug_implementations)]
#![deny(unsafe_op_in_unsafe_fn)]

#[macro_use]
pub mod macros;

pub mod arch;
pub mod board;
pub mod config;
pub mod drivers;
pub mod log;
pub mod mm;
pub mod power;
pub mod rand;
pub mod time;

#[cfg(target_os = "none")]
pub mod hooks;

#[cfg(target_os = "none")]
mod panic;

pub use board::Board;
pub use config::{BoardConfig, BoardRevision};
