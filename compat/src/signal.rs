//! Signal delivery.

/// Blocks until every queued signal has been delivered.
///
/// # Panics
///
/// Always: signals are never raised on the board, so nobody should be waiting on them.
pub fn signal_wait_until_idle() -> ! {
    panic!("signal_wait_until_idle: not implemented")
}
