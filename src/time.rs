//! Deterministic clock.
//!
//! There is no timer on the zkVM, and nothing that could be trusted as one. The clock is a
//! logical counter advanced once per query, which gives the program a strictly increasing
//! notion of time without any relation to wall-clock time. Timeouts built on top of it will
//! not behave as they would on a conventional machine.

/// Nanoseconds reported per clock tick.
pub const TICK_NS: i64 = 1000;

/// A logical clock advanced by every query.
#[derive(Debug, Default, Clone)]
pub struct LogicalClock {
    ticks: u64,
}

impl LogicalClock {
    /// Creates a clock at tick zero.
    pub const fn new() -> Self {
        Self { ticks: 0 }
    }

    /// Advances the clock by one tick and returns the new time in nanoseconds.
    pub fn nanotime(&mut self) -> i64 {
        self.ticks += 1;
        self.ticks as i64 * TICK_NS
    }

    /// Returns the number of queries served so far, without advancing the clock.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_first_tick() {
        let mut clock = LogicalClock::new();
        assert_eq!(clock.ticks(), 0);
        assert_eq!(clock.nanotime(), 1000);
        assert_eq!(clock.ticks(), 1);
    }

    #[test]
    fn strictly_increasing() {
        let mut clock = LogicalClock::new();

        let mut last = 0;
        for i in 1..=10_000 {
            let now = clock.nanotime();
            assert!(now > last);
            assert_eq!(now, 1000 * i);
            last = now;
        }
    }

    #[test]
    fn clocks_are_independent() {
        let mut a = LogicalClock::new();
        let mut b = LogicalClock::new();

        a.nanotime();
        a.nanotime();
        assert_eq!(b.nanotime(), 1000);
        assert_eq!(a.nanotime(), 3000);
    }
}
