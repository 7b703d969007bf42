//! Revision writing console output to the length-prefixed output buffer.

use super::*;

/// Input buffer address, at the bottom of system memory.
pub const INPUT_ADDR: usize = SYS_ADDR;
/// Input buffer size, up to the console register.
pub const INPUT_SIZE: usize = UART_ADDR - SYS_ADDR;
/// Stack reservation (8 MiB).
pub const STACK_SIZE: usize = 0x80_0000;
/// Heap start, right after the stack.
pub const HEAP_START: usize = RAM_ADDR + STACK_SIZE;

/// The output-stream board configuration.
pub const STREAM: BoardConfig = BoardConfig {
    revision: BoardRevision::Stream,
    map: zisk_map(INPUT_ADDR, INPUT_SIZE),
    layout: MemoryLayout {
        ram_start: RAM_ADDR,
        ram_size: RAM_SIZE,
        stack_size: STACK_SIZE,
        heap_start: HEAP_START,
        heap_reserve: HEAP_RESERVE,
    },
};
