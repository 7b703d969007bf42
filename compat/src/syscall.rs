//! System call numbers understood by the board.

/// Writes a buffer to a file descriptor. The only call the board services.
pub const SYS_WRITE: usize = 1;
