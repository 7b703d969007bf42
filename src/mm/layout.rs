//! Physical memory map and RAM layout.
//!
//! The zkVM exposes a fixed memory map: nothing is probed at runtime. The regions described here
//! are the hardware contract of the target, and every other component is built on top of them.

use core::fmt;

use bitflags::bitflags;

bitflags! {
    /// Access properties of a memory region.
    pub struct RegionFlags: u32 {
        /// The region can be read.
        const READ = 1 << 0;
        /// The region can be written.
        const WRITE = 1 << 1;
        /// The region contains executable code.
        const EXEC = 1 << 2;
        /// Accesses to the region are observed by the machine (memory-mapped I/O).
        const IO = 1 << 3;

        /// Read-only code.
        const RX = Self::READ.bits | Self::EXEC.bits;
        /// Read-write data.
        const RW = Self::READ.bits | Self::WRITE.bits;
    }
}

/// A named, fixed range of physical addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRegion {
    /// Human-readable region name.
    pub name: &'static str,
    /// First address of the region.
    pub base: usize,
    /// Length of the region in bytes.
    pub size: usize,
    /// Access properties.
    pub flags: RegionFlags,
}

impl MemoryRegion {
    /// Creates a new region descriptor.
    pub const fn new(name: &'static str, base: usize, size: usize, flags: RegionFlags) -> Self {
        Self {
            name,
            base,
            size,
            flags,
        }
    }

    /// Returns the first address past the end of the region, or `None` on overflow.
    pub const fn end(&self) -> Option<usize> {
        self.base.checked_add(self.size)
    }

    /// Returns true if `addr` lies within the region.
    pub fn contains(&self, addr: usize) -> bool {
        match self.end() {
            Some(end) => addr >= self.base && addr < end,
            None => addr >= self.base,
        }
    }

    /// Returns true if `other` lies entirely within this region.
    pub fn encloses(&self, other: &MemoryRegion) -> bool {
        match (self.end(), other.end()) {
            (Some(end), Some(other_end)) => other.base >= self.base && other_end <= end,
            _ => false,
        }
    }

    /// Returns true if the two regions share at least one address.
    pub fn overlaps(&self, other: &MemoryRegion) -> bool {
        let (a_end, b_end) = match (self.end(), other.end()) {
            (Some(a), Some(b)) => (a, b),
            _ => return true,
        };
        self.size != 0 && other.size != 0 && self.base < b_end && other.base < a_end
    }
}

impl fmt::Display for MemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[0x{:08x} - 0x{:08x}] {}",
            self.base,
            self.base.wrapping_add(self.size),
            self.name
        )
    }
}

/// The error type returned when a memory map or layout violates the platform invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    /// A region extends past the end of the address space.
    AddressOverflow(&'static str),
    /// Two regions that must be disjoint share addresses.
    Overlap(&'static str, &'static str),
    /// A region is not contained in its parent region.
    OutsideOf(&'static str, &'static str),
    /// No stack has been reserved.
    EmptyStack,
    /// The heap starts inside the stack reservation.
    HeapOverlapsStack {
        /// First address past the stack reservation.
        stack_end: usize,
        /// Configured heap start.
        heap_start: usize,
    },
    /// The heap cannot hold the expected live set before the end of RAM.
    HeapTooSmall {
        /// Bytes available between the heap start and the end of RAM.
        available: usize,
        /// Bytes the configuration expects to be available.
        required: usize,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::AddressOverflow(r) => write!(f, "region {} overflows address space", r),
            LayoutError::Overlap(a, b) => write!(f, "regions {} and {} overlap", a, b),
            LayoutError::OutsideOf(r, p) => write!(f, "region {} lies outside of {}", r, p),
            LayoutError::EmptyStack => write!(f, "no stack reserved"),
            LayoutError::HeapOverlapsStack {
                stack_end,
                heap_start,
            } => write!(
                f,
                "heap start 0x{:x} lies below stack end 0x{:x}",
                heap_start, stack_end
            ),
            LayoutError::HeapTooSmall {
                available,
                required,
            } => write!(
                f,
                "heap has 0x{:x} bytes available, 0x{:x} required",
                available, required
            ),
        }
    }
}

/// Fixed device and buffer addresses of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryMap {
    /// First BIOS instruction.
    pub rom_entry: MemoryRegion,
    /// Last BIOS instruction.
    pub rom_exit: MemoryRegion,
    /// Program code.
    pub rom: MemoryRegion,
    /// Input data supplied by the prover.
    pub input: MemoryRegion,
    /// System read-write memory, hosting the console register and the output buffer.
    pub system: MemoryRegion,
    /// Console (UART-like) data register.
    pub console: MemoryRegion,
    /// Output buffer.
    pub output: MemoryRegion,
}

impl MemoryMap {
    /// Checks that device regions are pairwise disjoint and nested where required.
    pub fn validate(&self, ram: &MemoryRegion) -> Result<(), LayoutError> {
        let leaves = [
            &self.rom_entry,
            &self.rom_exit,
            &self.rom,
            &self.input,
            &self.console,
            &self.output,
            ram,
        ];

        for r in leaves.iter().copied().chain(core::iter::once(&self.system)) {
            r.end().ok_or(LayoutError::AddressOverflow(r.name))?;
        }

        for (i, a) in leaves.iter().enumerate() {
            for b in &leaves[i + 1..] {
                if a.overlaps(b) {
                    return Err(LayoutError::Overlap(a.name, b.name));
                }
            }
        }

        for r in [&self.console, &self.output] {
            if !self.system.encloses(r) {
                return Err(LayoutError::OutsideOf(r.name, self.system.name));
            }
        }

        Ok(())
    }
}

/// Placement of stack and heap inside RAM.
///
/// The stack occupies `[ram_start, ram_start + stack_size)` and grows downwards from its top;
/// the heap occupies `[heap_start, ram_start + ram_size)`. Neither can grow past these bounds:
/// there is no virtual memory to back a larger reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryLayout {
    /// First address of RAM available to the program.
    pub ram_start: usize,
    /// Size of RAM in bytes.
    pub ram_size: usize,
    /// Bytes reserved for the stack at the bottom of RAM.
    pub stack_size: usize,
    /// First address of the heap.
    pub heap_start: usize,
    /// Minimum number of bytes the heap must be able to hold.
    pub heap_reserve: usize,
}

impl MemoryLayout {
    /// Returns the RAM region.
    pub const fn ram(&self) -> MemoryRegion {
        MemoryRegion::new("ram", self.ram_start, self.ram_size, RegionFlags::RW)
    }

    /// Returns the stack region.
    pub const fn stack(&self) -> MemoryRegion {
        MemoryRegion::new("stack", self.ram_start, self.stack_size, RegionFlags::RW)
    }

    /// Returns the heap region, which extends up to the end of RAM.
    pub const fn heap(&self) -> MemoryRegion {
        MemoryRegion::new(
            "heap",
            self.heap_start,
            self.ram_end().saturating_sub(self.heap_start),
            RegionFlags::RW,
        )
    }

    /// Returns the first address past the end of RAM.
    pub const fn ram_end(&self) -> usize {
        self.ram_start.saturating_add(self.ram_size)
    }

    /// Returns the initial stack pointer.
    pub const fn stack_top(&self) -> usize {
        self.ram_start.saturating_add(self.stack_size)
    }

    /// Checks the stack and heap carve-out.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let ram_end = self
            .ram_start
            .checked_add(self.ram_size)
            .ok_or(LayoutError::AddressOverflow("ram"))?;
        let stack_end = self
            .ram_start
            .checked_add(self.stack_size)
            .ok_or(LayoutError::AddressOverflow("stack"))?;

        if self.stack_size == 0 {
            return Err(LayoutError::EmptyStack);
        }
        if self.heap_start < stack_end {
            return Err(LayoutError::HeapOverlapsStack {
                stack_end,
                heap_start: self.heap_start,
            });
        }

        let available = ram_end.saturating_sub(self.heap_start);
        if available < self.heap_reserve {
            return Err(LayoutError::HeapTooSmall {
                available,
                required: self.heap_reserve,
            });
        }

        Ok(())
    }
}
