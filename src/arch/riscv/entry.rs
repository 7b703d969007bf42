//! RISC-V specific entry point.

use crate::hooks;

extern "C" {
    /// The program's entry point, see [`entrypoint!`](crate::entrypoint).
    fn main();
}

/// Board entry point, jumped to by `_start` in `startup.S`.
///
/// `input`, `output` and `stack_top` are the contents of `a0`, `a1` and `a2` as set up by the
/// bootstrap code.
/// Returning from the program's `main` halts the machine with exit code 0.
///
/// # Safety
///
/// Must be called exactly once, by the bootstrap code, with `.bss` zeroed and the stack
/// pointer at the top of the stack reservation.
#[no_mangle]
pub unsafe extern "C" fn board_entry(input: usize, output: usize, stack_top: usize) -> ! {
    hooks::init(input, output, stack_top);

    // SAFETY: `main` is provided by the program through `entrypoint!`
    unsafe { main() };

    hooks::shutdown(0)
}
