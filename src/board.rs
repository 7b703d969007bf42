//! Board context.
//!
//! All of the mutable state of the board layer (output cursor, logical clock, power state)
//! lives in a single [`Board`] value. The target keeps exactly one of them for the lifetime of
//! the machine; tests create as many independent boards as they like.

use core::fmt;

use compat::syscall::SYS_WRITE;

use crate::{
    config::BoardConfig,
    drivers::console::Console,
    mm::{layout::LayoutError, mmio::IoMem},
    power::{HaltEvent, HaltTrap, PowerControl},
    rand,
    time::LogicalClock,
};

/// Bad file descriptor.
pub const EBADF: isize = 9;
/// Function not implemented.
pub const ENOSYS: isize = 38;

const STDOUT: usize = 1;
const STDERR: usize = 2;

/// The error type returned when the bootstrap code did not honour the register contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootError {
    /// `a0` does not hold the input buffer address.
    InputAddress {
        /// Address required by the board configuration.
        expected: usize,
        /// Address found in the register.
        found: usize,
    },
    /// `a1` does not hold the output buffer address.
    OutputAddress {
        /// Address required by the board configuration.
        expected: usize,
        /// Address found in the register.
        found: usize,
    },
    /// The stack pointer is not at the top of the stack reservation.
    StackPointer {
        /// Top of the stack reservation in the board configuration.
        expected: usize,
        /// Stack pointer handed over by the bootstrap code.
        found: usize,
    },
}

impl fmt::Display for BootError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootError::InputAddress { expected, found } => write!(
                f,
                "input address is 0x{:x}, expected 0x{:x}",
                found, expected
            ),
            BootError::OutputAddress { expected, found } => write!(
                f,
                "output address is 0x{:x}, expected 0x{:x}",
                found, expected
            ),
            BootError::StackPointer { expected, found } => write!(
                f,
                "stack pointer is 0x{:x}, expected 0x{:x}",
                found, expected
            ),
        }
    }
}

/// The board layer state of one machine.
#[derive(Debug)]
pub struct Board<M, T> {
    config: BoardConfig,
    console: Console<M>,
    clock: LogicalClock,
    power: PowerControl,
    trap: T,
}

impl<M, T> Board<M, T>
where
    M: IoMem,
    T: HaltTrap,
{
    /// Brings up a board.
    ///
    /// The memory configuration is validated first: a board with overlapping regions, or
    /// whose heap cannot hold the expected live set, is never constructed.
    pub fn new(config: BoardConfig, mem: M, trap: T) -> Result<Self, LayoutError> {
        config.validate()?;

        rand::init();

        Ok(Self {
            console: Console::new(mem, config.revision.output_policy(), &config.map),
            clock: LogicalClock::new(),
            power: PowerControl::new(),
            config,
            trap,
        })
    }

    /// Checks the values the bootstrap code placed in `a0` and `a1`, and the stack pointer it
    /// handed over.
    pub fn check_registers(&self, a0: usize, a1: usize, sp: usize) -> Result<(), BootError> {
        if a0 != self.config.input_addr() {
            return Err(BootError::InputAddress {
                expected: self.config.input_addr(),
                found: a0,
            });
        }
        if a1 != self.config.output_addr() {
            return Err(BootError::OutputAddress {
                expected: self.config.output_addr(),
                found: a1,
            });
        }
        if sp != self.config.layout.stack_top() {
            return Err(BootError::StackPointer {
                expected: self.config.layout.stack_top(),
                found: sp,
            });
        }
        Ok(())
    }

    /// Returns the board configuration.
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Returns the console.
    pub fn console(&self) -> &Console<M> {
        &self.console
    }

    /// Returns the power controller.
    pub fn power(&self) -> &PowerControl {
        &self.power
    }

    /// Emits a byte on the console. Dropped once the machine is halting.
    pub fn putc(&mut self, byte: u8) {
        if self.power.is_running() {
            self.console.put(byte);
        }
    }

    /// Emits every byte of `buf` on the console.
    pub fn write(&mut self, buf: &[u8]) {
        for b in buf {
            self.putc(*b);
        }
    }

    /// Writes `buf` to the file descriptor `fd`.
    ///
    /// Standard output and standard error both go to the console. Returns the number of bytes
    /// written, or `-EBADF` for any other descriptor.
    pub fn write_fd(&mut self, fd: usize, buf: &[u8]) -> isize {
        match fd {
            STDOUT | STDERR => {
                self.write(buf);
                buf.len() as isize
            }
            _ => -EBADF,
        }
    }

    /// Services the system call `num`.
    ///
    /// `SYS_WRITE` is the only call the board knows: `fd` and `buf` are its arguments and are
    /// ignored otherwise. Unknown calls fail with `-ENOSYS`.
    pub fn syscall(&mut self, num: usize, fd: usize, buf: &[u8]) -> isize {
        match num {
            SYS_WRITE => self.write_fd(fd, buf),
            _ => -ENOSYS,
        }
    }

    /// Returns the current logical time in nanoseconds, advancing the clock.
    pub fn nanotime(&mut self) -> i64 {
        self.clock.nanotime()
    }

    /// Fills `buf` with deterministic bytes. See [`rand`] for why this is not random.
    pub fn fill_random(&self, buf: &mut [u8]) {
        rand::fill(buf);
    }

    /// Records a halt request without executing the trap.
    pub fn request_halt(&mut self, code: i32) -> Option<HaltEvent> {
        self.power.request_halt(code)
    }

    /// Halts the machine.
    ///
    /// The exit code of the first halt request wins, should a halt already be in progress.
    pub fn exit(&mut self, code: i32) -> ! {
        self.power.request_halt(code);
        let code = self.power.exit_code().unwrap_or(code);
        self.trap.halt(code)
    }
}

impl<M, T> fmt::Write for Board<M, T>
where
    M: IoMem,
    T: HaltTrap,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write(s.as_bytes());
        Ok(())
    }
}
