//! Byte console.
//!
//! The console accepts one byte at a time, without buffering or backpressure. Depending on the
//! board revision, bytes are either stored to the console register, or appended to the
//! length-prefixed output buffer:
//!
//! ```text
//! output_base + 0   count of valid bytes (u32, little-endian)
//! output_base + 4   byte 0
//! output_base + 5   byte 1
//! ...
//! ```

use core::fmt;

use crate::mm::{
    layout::{MemoryMap, MemoryRegion},
    mmio::IoMem,
};

/// Size of the length prefix of the output buffer.
pub const COUNT_LEN: usize = 4;

/// How console bytes reach the outside world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputPolicy {
    /// Store each byte at the console register.
    Uart,
    /// Append each byte to the length-prefixed output buffer.
    Stream,
}

/// Console driver.
#[derive(Debug)]
pub struct Console<M> {
    mem: M,
    policy: OutputPolicy,
    register: usize,
    output: MemoryRegion,
    cursor: u32,
}

impl<M> Console<M>
where
    M: IoMem,
{
    /// Creates a console writing to the devices of `map`.
    pub fn new(mem: M, policy: OutputPolicy, map: &MemoryMap) -> Self {
        Self {
            mem,
            policy,
            register: map.console.base,
            output: map.output,
            cursor: 0,
        }
    }

    /// Writes a single byte.
    ///
    /// # Panics
    ///
    /// Panics if the output buffer is full. The buffer size is part of the board
    /// configuration, so running out of it is a configuration error.
    pub fn put(&mut self, byte: u8) {
        match self.policy {
            OutputPolicy::Uart => self.mem.write_u8(self.register, byte),
            OutputPolicy::Stream => {
                let offset = self.cursor as usize;
                if offset >= self.capacity() {
                    panic!("console: output buffer full ({} bytes)", self.capacity());
                }

                self.cursor += 1;
                self.mem.write_u32(self.output.base, self.cursor);
                self.mem.write_u8(self.output.base + COUNT_LEN + offset, byte);
            }
        }
    }

    /// Writes every byte of `buf`.
    pub fn write_bytes(&mut self, buf: &[u8]) {
        for b in buf {
            self.put(*b);
        }
    }

    /// Returns the number of bytes written to the output buffer so far.
    ///
    /// Always zero when the console register is used.
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    /// Returns the output policy.
    pub fn policy(&self) -> OutputPolicy {
        self.policy
    }

    /// Returns the number of payload bytes the output buffer can hold.
    pub fn capacity(&self) -> usize {
        self.output.size.saturating_sub(COUNT_LEN)
    }

    /// Returns the underlying memory.
    pub fn mem(&self) -> &M {
        &self.mem
    }
}

impl<M> fmt::Write for Console<M>
where
    M: IoMem,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_bytes(s.as_bytes());
        Ok(())
    }
}

/// Reader side of the length-prefixed output buffer.
#[derive(Debug)]
pub struct OutputStream;

impl OutputStream {
    /// Returns the valid payload of a dump of the output buffer.
    ///
    /// The count is the only source of truth: trailing bytes are ignored. Returns `None` if
    /// the dump is shorter than the count claims.
    pub fn decode(region: &[u8]) -> Option<&[u8]> {
        let count = region.get(..COUNT_LEN)?;
        let count = u32::from_le_bytes([count[0], count[1], count[2], count[3]]) as usize;

        region.get(COUNT_LEN..COUNT_LEN.checked_add(count)?)
    }
}
