//! Memory management facilities.

pub use bump::BumpAllocator;

pub mod layout;
pub mod mmio;

mod bump;
