use core::{
    panic::PanicInfo,
    sync::atomic::{AtomicBool, Ordering},
};

use crate::{arch, hooks};

static PANICKING: AtomicBool = AtomicBool::new(false);

/// Implements the board's panic behavior.
#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    // Panicking while reporting a panic (eg. output buffer full): stop right away
    if PANICKING.swap(true, Ordering::SeqCst) {
        arch::halt(hooks::EXIT_PANIC);
    }

    // SAFETY: there is a single hart, so whoever held the board lock will never resume
    unsafe { hooks::release_board() };

    kprintln!("Board panic: {}", info);
    kprintln!("Halting!");

    hooks::shutdown(hooks::EXIT_PANIC)
}
