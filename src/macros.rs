//! Console printing macros.

/// Prints to the board console.
///
/// Equivalent to the [`kprintln!`] macro except that a newline is not printed
/// at the end of the message.
///
/// Output is silently dropped until the board has been brought up.
#[macro_export]
macro_rules! kprint {
    ($($arg:tt)*) => {{
        use core::fmt::Write;

        write!($crate::log::Log, $($arg)*).ok();
    }};
}

/// Prints to the board console with a newline (`\n`).
#[macro_export]
macro_rules! kprintln {
    () => {
        $crate::kprint!("\n")
    };
    ($fmt:expr) => {
        $crate::kprint!(concat!($fmt, "\n"))
    };
    ($fmt:expr, $($arg:tt)+) => {
        $crate::kprint!(concat!($fmt, "\n"), $($arg)+)
    };
}

/// Declares the program's entry point.
///
/// The board brings the machine up, calls the given function, and halts with exit code 0 once
/// it returns.
///
/// ```ignore
/// #![no_std]
/// #![no_main]
///
/// zkboard::entrypoint!(main);
///
/// fn main() {
///     zkboard::kprintln!("Hello from the zkVM!");
/// }
/// ```
#[macro_export]
macro_rules! entrypoint {
    ($path:path) => {
        const BOARD_MAIN: fn() = $path;

        mod zkboard_generated_main {
            #[no_mangle]
            extern "C" fn main() {
                super::BOARD_MAIN()
            }
        }
    };
}
