//! This module provides RISC-V specific functions.

use core::arch::asm;

#[cfg(target_os = "none")]
mod entry;

/// Environment call number terminating the machine.
const SYS_EXIT: usize = 93;

/// Halts the machine with the given exit code.
///
/// Executes the exit environment call, which stops the zkVM. There is nothing to return to.
pub fn halt(code: i32) -> ! {
    // SAFETY: the exit call never returns and touches no memory
    unsafe {
        asm!(
            "ecall",
            in("a0") code as isize,
            in("a7") SYS_EXIT,
            options(noreturn, nostack)
        );
    }
}
