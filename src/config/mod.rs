//! Board configurations.
//!
//! Two board revisions exist. They share the ZisK memory map but disagree on the input buffer
//! address, on how output is produced and on how much RAM is set aside for the stack. They are
//! kept as two named configurations; the one used by the hook surface is selected at build time
//! with the `config-uart` (default) or `config-stream` feature.

use core::fmt;

use crate::{
    drivers::console::OutputPolicy,
    mm::layout::{LayoutError, MemoryLayout, MemoryMap, MemoryRegion, RegionFlags},
};

mod stream;
mod uart;

pub use stream::STREAM;
pub use uart::UART;

#[cfg(all(feature = "config-uart", feature = "config-stream"))]
compile_error!("features `config-uart` and `config-stream` are mutually exclusive");

/// The configuration selected at build time.
#[cfg(not(feature = "config-stream"))]
pub const ACTIVE: BoardConfig = UART;

/// The configuration selected at build time.
#[cfg(feature = "config-stream")]
pub const ACTIVE: BoardConfig = STREAM;

/// First BIOS instruction address.
pub const ROM_ENTRY: usize = 0x1000;
/// Last BIOS instruction address.
pub const ROM_EXIT: usize = 0x1004;
/// First program ROM instruction address.
pub const ROM_ADDR: usize = 0x8000_0000;
/// Size of program ROM.
pub const ROM_SIZE: usize = 0x1000_0000;
/// First system read-write memory address.
pub const SYS_ADDR: usize = 0xa000_0000;
/// Size of system memory, up to the start of RAM.
pub const SYS_SIZE: usize = 0x2_0000;
/// Console data register.
pub const UART_ADDR: usize = SYS_ADDR + 0x200;
/// First output buffer address.
pub const OUTPUT_ADDR: usize = 0xa001_0000;
/// Size of the output buffer.
pub const OUTPUT_SIZE: usize = 0x1_0000;
/// First RAM address available to the program.
pub const RAM_ADDR: usize = 0xa002_0000;
/// Size of RAM (~512 MiB).
pub const RAM_SIZE: usize = 0x1ffe_0000;
/// Expected live-set size the heap must be able to accommodate.
pub const HEAP_RESERVE: usize = 0x100_0000;

/// A board revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardRevision {
    /// Output goes straight to the memory-mapped console register.
    Uart,
    /// Output is appended to the length-prefixed output buffer.
    Stream,
}

impl BoardRevision {
    /// Returns how this revision emits console bytes.
    pub const fn output_policy(self) -> OutputPolicy {
        match self {
            BoardRevision::Uart => OutputPolicy::Uart,
            BoardRevision::Stream => OutputPolicy::Stream,
        }
    }
}

impl fmt::Display for BoardRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BoardRevision::Uart => "uart",
            BoardRevision::Stream => "stream",
        })
    }
}

/// Everything the board layer needs to know about the machine it runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    /// Board revision.
    pub revision: BoardRevision,
    /// Fixed device and buffer addresses.
    pub map: MemoryMap,
    /// Stack and heap placement in RAM.
    pub layout: MemoryLayout,
}

impl BoardConfig {
    /// Checks every memory invariant of the configuration.
    pub fn validate(&self) -> Result<(), LayoutError> {
        self.map.validate(&self.layout.ram())?;
        self.layout.validate()
    }

    /// Address the bootstrap code must place in `a0`.
    pub const fn input_addr(&self) -> usize {
        self.map.input.base
    }

    /// Address the bootstrap code must place in `a1`.
    pub const fn output_addr(&self) -> usize {
        self.map.output.base
    }
}

/// Builds the memory map shared by every revision, given its input buffer.
const fn zisk_map(input_addr: usize, input_size: usize) -> MemoryMap {
    MemoryMap {
        rom_entry: MemoryRegion::new("rom-entry", ROM_ENTRY, 4, RegionFlags::RX),
        rom_exit: MemoryRegion::new("rom-exit", ROM_EXIT, 4, RegionFlags::RX),
        rom: MemoryRegion::new("rom", ROM_ADDR, ROM_SIZE, RegionFlags::RX),
        input: MemoryRegion::new("input", input_addr, input_size, RegionFlags::READ),
        system: MemoryRegion::new("system", SYS_ADDR, SYS_SIZE, RegionFlags::RW),
        console: MemoryRegion::new("console", UART_ADDR, 8, RegionFlags::IO),
        output: MemoryRegion::new("output", OUTPUT_ADDR, OUTPUT_SIZE, RegionFlags::RW),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revisions_are_valid() {
        for cfg in &[UART, STREAM] {
            assert_eq!(cfg.validate(), Ok(()), "{} revision", cfg.revision);

            let l = &cfg.layout;
            assert!(l.heap_start >= l.ram_start + l.stack_size);
            assert!(l.heap_start + l.heap_reserve <= l.ram_start + l.ram_size);
        }
    }

    #[test]
    fn revisions_differ() {
        assert_eq!(UART.input_addr(), 0x9000_0000);
        assert_eq!(STREAM.input_addr(), 0xa000_0000);
        assert_eq!(UART.output_addr(), STREAM.output_addr());
        assert!(UART.layout.stack_size < STREAM.layout.stack_size);
        assert_eq!(UART.revision.output_policy(), OutputPolicy::Uart);
        assert_eq!(STREAM.revision.output_policy(), OutputPolicy::Stream);
    }

    #[test]
    fn overlapping_devices_are_rejected() {
        let mut cfg = UART;
        cfg.map.output.base = RAM_ADDR - 0x100;
        assert_eq!(cfg.validate(), Err(LayoutError::Overlap("output", "ram")));

        let mut cfg = STREAM;
        cfg.map.input.size = 0x400;
        assert_eq!(
            cfg.validate(),
            Err(LayoutError::Overlap("input", "console"))
        );
    }

    #[test]
    fn console_must_live_in_system_memory() {
        let mut cfg = UART;
        cfg.map.console.base = 0x9800_0000;
        cfg.map.input.size = 0x100;
        assert_eq!(
            cfg.validate(),
            Err(LayoutError::OutsideOf("console", "system"))
        );
    }

    #[test]
    fn active_is_one_of_the_revisions() {
        assert!(ACTIVE == UART || ACTIVE == STREAM);
    }
}
