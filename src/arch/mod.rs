//! Architecture-specific functions.

/// RISC-V architecture.
#[cfg(target_arch = "riscv64")]
pub mod riscv;
#[cfg(target_arch = "riscv64")]
pub use self::riscv::*;

/// Halt stub used on the host.
///
/// There is no machine to stop outside of the zkVM, so reaching this is a bug.
#[cfg(not(target_arch = "riscv64"))]
pub fn halt(code: i32) -> ! {
    unimplemented!("halt is only available on riscv64 targets (exit code {})", code)
}
