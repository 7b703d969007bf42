use core::{
    alloc::{GlobalAlloc, Layout},
    ptr::null_mut,
};

use spin::Mutex;

use super::layout::MemoryLayout;

/// The heap of the board: a bump allocator over the RAM left above the stack.
///
/// Chunks are carved upwards from the start of the heap. Releasing the most recent chunk gives
/// its memory back; anything else is only reclaimed once every allocation has been released,
/// in which case the allocator starts over. Programs run once on the zkVM, so this is enough.
///
/// The allocator also keeps track of the highest amount of memory in use, to be compared with
/// the heap reservation of the layout.
#[derive(Debug)]
pub struct BumpAllocator {
    heap: Mutex<Heap>,
}

#[derive(Debug)]
struct Heap {
    start: usize,
    end: usize,
    next: usize,
    live: usize,
    peak: usize,
    reserve: usize,
}

impl BumpAllocator {
    /// Creates the heap described by `layout`: from its heap start to the end of RAM.
    pub const fn new(layout: &MemoryLayout) -> Self {
        Self::with_bounds(layout.heap_start, layout.ram_end(), layout.heap_reserve)
    }

    /// Creates a heap over `[start, end)` expected to need at most `reserve` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`.
    pub const fn with_bounds(start: usize, end: usize, reserve: usize) -> Self {
        assert!(start <= end);
        Self {
            heap: Mutex::new(Heap {
                start,
                end,
                next: start,
                live: 0,
                peak: 0,
                reserve,
            }),
        }
    }

    /// Returns the number of bytes currently in use, including alignment padding.
    pub fn used(&self) -> usize {
        let heap = self.heap.lock();
        heap.next - heap.start
    }

    /// Returns the highest number of bytes ever in use at once.
    pub fn peak(&self) -> usize {
        self.heap.lock().peak
    }

    /// Returns the number of live allocations.
    pub fn live(&self) -> usize {
        self.heap.lock().live
    }

    /// Returns whether the heap never grew past the reservation of its layout.
    pub fn within_reserve(&self) -> bool {
        let heap = self.heap.lock();
        heap.peak <= heap.reserve
    }
}

impl Heap {
    fn alloc(&mut self, layout: Layout) -> Option<usize> {
        let align = layout.align() - 1;
        let addr = self.next.checked_add(align)? & !align;
        let next = addr.checked_add(layout.size())?;
        if next > self.end {
            return None;
        }

        self.next = next;
        self.live += 1;
        self.peak = self.peak.max(next - self.start);
        Some(addr)
    }

    fn dealloc(&mut self, addr: usize, layout: Layout) {
        self.live -= 1;
        if self.live == 0 {
            self.next = self.start;
        } else if addr + layout.size() == self.next {
            self.next = addr;
        }
    }
}

// SAFETY: chunks are aligned, never handed out twice while live, and lie within [start, end)
unsafe impl GlobalAlloc for BumpAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        match self.heap.lock().alloc(layout) {
            Some(addr) => addr as *mut u8,
            None => null_mut(),
        }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        self.heap.lock().dealloc(ptr as usize, layout);
    }
}
