//! Functions and types for dealing with memory-mapped I/O.
//!
//! The board talks to the zkVM exclusively through fixed physical addresses. All such accesses
//! go through the [`IoMem`] trait, so that the shims can run against real memory on the target
//! and against a plain buffer in tests.

use core::fmt;

/// Byte-addressable access to physical memory.
///
/// Multi-byte values are little-endian, matching the RISC-V memory model.
pub trait IoMem {
    /// Writes a byte at physical address `addr`.
    fn write_u8(&mut self, addr: usize, val: u8);

    /// Reads the byte at physical address `addr`.
    fn read_u8(&self, addr: usize) -> u8;

    /// Writes a 32-bit value at physical address `addr`.
    fn write_u32(&mut self, addr: usize, val: u32) {
        for (i, b) in val.to_le_bytes().iter().enumerate() {
            self.write_u8(addr + i, *b);
        }
    }

    /// Reads a 32-bit value at physical address `addr`.
    fn read_u32(&self, addr: usize) -> u32 {
        let mut bytes = [0u8; 4];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = self.read_u8(addr + i);
        }
        u32::from_le_bytes(bytes)
    }
}

/// Direct volatile access to physical memory.
///
/// Only meaningful on the target, where the zkVM memory map is identity-mapped.
#[derive(Debug)]
pub struct PhysMem {
    _private: (),
}

impl PhysMem {
    /// Returns a handle to physical memory.
    ///
    /// # Safety
    ///
    /// The caller must ensure that every address later passed to this handle is valid,
    /// writable memory of the current machine, and that at most one handle is used to
    /// drive a given device.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl IoMem for PhysMem {
    #[inline(always)]
    fn write_u8(&mut self, addr: usize, val: u8) {
        // SAFETY: validity of `addr` was promised at construction
        unsafe { (addr as *mut u8).write_volatile(val) }
    }

    #[inline(always)]
    fn read_u8(&self, addr: usize) -> u8 {
        // SAFETY: validity of `addr` was promised at construction
        unsafe { (addr as *const u8).read_volatile() }
    }

    #[inline(always)]
    fn write_u32(&mut self, addr: usize, val: u32) {
        let ptr = addr as *mut u32;
        if ptr.align_offset(4) == 0 {
            // SAFETY: aligned, and validity of `addr` was promised at construction
            unsafe { ptr.write_volatile(val.to_le()) }
        } else {
            for (i, b) in val.to_le_bytes().iter().enumerate() {
                self.write_u8(addr + i, *b);
            }
        }
    }
}

/// A window of physical address space backed by a byte buffer.
///
/// Accesses outside of `[base, base + buf.len())` panic, the same way a stray store would
/// fault the machine.
pub struct WindowMem<'a> {
    base: usize,
    buf: &'a mut [u8],
}

impl<'a> WindowMem<'a> {
    /// Creates a window mapping `buf` at physical address `base`.
    pub fn new(base: usize, buf: &'a mut [u8]) -> Self {
        Self { base, buf }
    }

    /// Returns the physical address of the first byte of the window.
    pub fn base(&self) -> usize {
        self.base
    }

    /// Returns the backing bytes.
    pub fn as_slice(&self) -> &[u8] {
        self.buf
    }

    fn offset(&self, addr: usize) -> usize {
        match addr.checked_sub(self.base) {
            Some(off) if off < self.buf.len() => off,
            _ => panic!(
                "access to 0x{:x} outside of window [0x{:x} - 0x{:x})",
                addr,
                self.base,
                self.base + self.buf.len()
            ),
        }
    }
}

impl IoMem for WindowMem<'_> {
    fn write_u8(&mut self, addr: usize, val: u8) {
        let off = self.offset(addr);
        self.buf[off] = val;
    }

    fn read_u8(&self, addr: usize) -> u8 {
        self.buf[self.offset(addr)]
    }
}

impl fmt::Debug for WindowMem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowMem")
            .field("base", &format_args!("0x{:x}", self.base))
            .field("len", &self.buf.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_little_endian_words() {
        let mut buf = [0u8; 8];
        let mut mem = WindowMem::new(0x1000, &mut buf);

        mem.write_u32(0x1002, 0xdead_beef);
        assert_eq!(mem.read_u32(0x1002), 0xdead_beef);
        assert_eq!(mem.as_slice(), &[0, 0, 0xef, 0xbe, 0xad, 0xde, 0, 0]);
    }

    #[test]
    #[should_panic(expected = "outside of window")]
    fn window_rejects_stray_store() {
        let mut buf = [0u8; 4];
        let mut mem = WindowMem::new(0x1000, &mut buf);
        mem.write_u8(0x1004, 1);
    }

    #[test]
    #[should_panic(expected = "outside of window")]
    fn window_rejects_address_below_base() {
        let mut buf = [0u8; 4];
        let mem = WindowMem::new(0x1000, &mut buf);
        mem.read_u8(0xfff);
    }
}
