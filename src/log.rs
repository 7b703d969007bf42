//! Board diagnostics.
//!
//! Everything printed with [`kprint!`](crate::kprint) goes to the board console, after
//! whatever the program wrote so far. Before the board is up, and on the host, it goes nowhere.

use core::fmt;

/// Writer behind the print macros.
#[derive(Debug, Default, Clone, Copy)]
pub struct Log;

impl fmt::Write for Log {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        emit(s.as_bytes());
        Ok(())
    }
}

#[cfg(target_os = "none")]
fn emit(bytes: &[u8]) {
    crate::hooks::console_write(bytes);
}

#[cfg(all(not(target_os = "none"), not(test)))]
fn emit(_bytes: &[u8]) {}

#[cfg(all(not(target_os = "none"), test))]
fn emit(bytes: &[u8]) {
    tests::CAPTURED.with(|c| c.borrow_mut().extend_from_slice(bytes));
}
