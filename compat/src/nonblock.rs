//! Non-blocking I/O queries.
//!
//! Every descriptor on the board is blocking.

/// Reports whether `fd` is in non-blocking mode.
pub fn is_nonblock(_fd: i32) -> Result<bool, crate::osinfo::Unsupported> {
    Ok(false)
}

/// Reports whether the open flags `flag` request non-blocking mode.
pub fn has_nonblock_flag(_flag: i32) -> bool {
    false
}
