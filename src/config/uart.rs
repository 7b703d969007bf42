//! Revision driving the memory-mapped console register directly.

use super::*;

/// Input buffer address.
pub const INPUT_ADDR: usize = 0x9000_0000;
/// Input buffer size, up to the start of system memory.
pub const INPUT_SIZE: usize = SYS_ADDR - INPUT_ADDR;
/// Stack reservation (1 MiB).
pub const STACK_SIZE: usize = 0x10_0000;
/// Heap start, right after the stack.
pub const HEAP_START: usize = RAM_ADDR + STACK_SIZE;

/// The direct-console board configuration.
pub const UART: BoardConfig = BoardConfig {
    revision: BoardRevision::Uart,
    map: zisk_map(INPUT_ADDR, INPUT_SIZE),
    layout: MemoryLayout {
        ram_start: RAM_ADDR,
        ram_size: RAM_SIZE,
        stack_size: STACK_SIZE,
        heap_start: HEAP_START,
        heap_reserve: HEAP_RESERVE,
    },
};
