//! Hook surface consumed by the program.
//!
//! Everything the program (or its runtime) needs from the board goes through here: memory
//! layout values, a byte output, a clock, a random source, and a way to stop the machine.
//! The single [`Board`] of the machine is created by [`init`] and lives in a static.

use core::slice;

use spin::Mutex;

use compat::syscall::SYS_WRITE;

use crate::{
    arch,
    board::{Board, EBADF, ENOSYS},
    config,
    mm::{mmio::PhysMem, BumpAllocator},
    power::EcallTrap,
    rand,
};

/// Exit code used when the memory configuration is invalid.
pub const EXIT_BAD_LAYOUT: i32 = 2;
/// Exit code used when the bootstrap registers do not match the configuration.
pub const EXIT_BAD_BOOT: i32 = 3;
/// Exit code used after a panic.
pub const EXIT_PANIC: i32 = 101;

type TargetBoard = Board<PhysMem, EcallTrap>;

/// The board of this machine.
static BOARD: Mutex<Option<TargetBoard>> = Mutex::new(None);

#[global_allocator]
static HEAP: BumpAllocator = BumpAllocator::new(&config::ACTIVE.layout);

/// First address of RAM.
#[no_mangle]
pub static RAM_START: usize = config::ACTIVE.layout.ram_start;

/// Size of RAM in bytes.
#[no_mangle]
pub static RAM_SIZE: usize = config::ACTIVE.layout.ram_size;

/// First address of the heap.
#[no_mangle]
pub static HEAP_START: usize = config::ACTIVE.layout.heap_start;

/// Bytes reserved for the stack at the bottom of RAM.
#[no_mangle]
pub static STACK_SIZE: usize = config::ACTIVE.layout.stack_size;

fn with_board<R>(f: impl FnOnce(&mut TargetBoard) -> R) -> Option<R> {
    BOARD.lock().as_mut().map(f)
}

/// Writes board diagnostics to the console. Dropped until [`init`] has run.
pub(crate) fn console_write(bytes: &[u8]) {
    with_board(|board| board.write(bytes));
}

/// Brings up the board. Called once by the entry code, before the program runs.
///
/// `a0` and `a1` are the values the bootstrap code placed in the corresponding registers, and
/// `sp` the stack pointer it set up. Any violation of the platform contract halts the machine.
pub(crate) fn init(a0: usize, a1: usize, sp: usize) {
    // SAFETY: the zkVM memory map is identity-mapped, and this is the only handle
    let mem = unsafe { PhysMem::new() };

    let board = match Board::new(config::ACTIVE, mem, EcallTrap) {
        Ok(board) => board,
        // No console can be trusted with a broken memory map
        Err(_) => arch::halt(EXIT_BAD_LAYOUT),
    };
    let boot = board.check_registers(a0, a1, sp);

    *BOARD.lock() = Some(board);

    if let Err(e) = boot {
        kprintln!("zkboard: bootstrap contract violated: {}", e);
        shutdown(EXIT_BAD_BOOT);
    }

    #[cfg(feature = "verbose")]
    {
        let cfg = &config::ACTIVE;
        kprintln!("zkboard: {} revision", cfg.revision);
        kprintln!("  {}", cfg.map.input);
        kprintln!("  {}", cfg.map.output);
        kprintln!("  {}", cfg.layout.stack());
        kprintln!("  {}", cfg.layout.heap());
    }
}

/// Halts the machine, through the board if it has been brought up.
pub fn shutdown(code: i32) -> ! {
    #[cfg(feature = "verbose")]
    {
        kprintln!("zkboard: heap peak {} bytes", HEAP.peak());
        if !HEAP.within_reserve() {
            kprintln!("zkboard: heap reservation exceeded");
        }
    }

    let mut board = BOARD.lock();
    match board.as_mut() {
        Some(board) => board.exit(code),
        None => arch::halt(code),
    }
}

/// Releases the board lock, whoever holds it.
///
/// # Safety
///
/// Only sound when the holder of the lock can never resume, as is the case when the (only)
/// hart panicked while holding it.
pub(crate) unsafe fn release_board() {
    if BOARD.is_locked() {
        // SAFETY: assuming the caller has upheld the safety contract
        unsafe { BOARD.force_unlock() };
    }
}

/// Emits a byte on the console.
#[no_mangle]
pub extern "C" fn sys_putchar(c: u8) {
    with_board(|board| board.putc(c));
}

/// Writes `len` bytes from `buf` to the file descriptor `fd`. Only standard output and
/// standard error are known, see [`Board::write_fd`].
///
/// # Safety
///
/// `buf` must be valid for reads of `len` bytes.
#[no_mangle]
pub unsafe extern "C" fn sys_write(fd: usize, buf: *const u8, len: usize) -> isize {
    // SAFETY: assuming the caller has upheld the safety contract
    let bytes = unsafe { slice::from_raw_parts(buf, len) };
    with_board(|board| board.write_fd(fd, bytes)).unwrap_or(-EBADF)
}

/// Dispatches a numbered system call, see [`Board::syscall`].
///
/// # Safety
///
/// For `SYS_WRITE`, `a1` must be valid for reads of `a2` bytes.
#[no_mangle]
pub unsafe extern "C" fn sys_syscall(num: usize, a0: usize, a1: usize, a2: usize) -> isize {
    let buf: &[u8] = if num == SYS_WRITE {
        // SAFETY: assuming the caller has upheld the safety contract
        unsafe { slice::from_raw_parts(a1 as *const u8, a2) }
    } else {
        &[]
    };
    with_board(|board| board.syscall(num, a0, buf)).unwrap_or(-ENOSYS)
}

/// Returns the logical time in nanoseconds. Strictly increasing across calls.
///
/// The program only starts once [`init`] has run, so the board is always there to answer. The
/// `0` fallback can only be observed by code running before `board_entry`, and there is none.
#[no_mangle]
pub extern "C" fn sys_nanotime() -> i64 {
    with_board(|board| board.nanotime()).unwrap_or(0)
}

/// Fills `len` bytes at `buf` with the deterministic byte pattern.
///
/// # Safety
///
/// `buf` must be valid for writes of `len` bytes.
#[no_mangle]
pub unsafe extern "C" fn sys_rand(buf: *mut u8, len: usize) {
    // SAFETY: assuming the caller has upheld the safety contract
    let bytes = unsafe { slice::from_raw_parts_mut(buf, len) };
    deterministic_entropy(bytes);
}

/// Stops the machine.
#[no_mangle]
pub extern "C" fn sys_halt(code: i32) -> ! {
    shutdown(code)
}

fn deterministic_entropy(buf: &mut [u8]) {
    #[cfg(feature = "verbose")]
    {
        static WARNING: spin::Once<()> = spin::Once::new();
        WARNING.call_once(|| {
            kprintln!("rand: deterministic byte pattern in use, do not derive secrets from it");
        });
    }

    if with_board(|board| board.fill_random(&mut *buf)).is_none() {
        rand::fill(buf);
    }
}

fn zkvm_getrandom(buf: &mut [u8]) -> Result<(), getrandom::Error> {
    deterministic_entropy(buf);
    Ok(())
}

getrandom::register_custom_getrandom!(zkvm_getrandom);
