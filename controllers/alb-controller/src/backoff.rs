//! # Fibonacci Backoff
//!
//! Delay between failed reconciliation passes. Grows along the Fibonacci
//! sequence (min, min, 2·min, 3·min, 5·min, …) up to a cap, and snaps back to
//! the minimum after a pass succeeds.

use std::time::Duration;

/// Fibonacci backoff over whole seconds
#[derive(Debug, Clone)]
pub struct FibonacciBackoff {
    min_secs: u64,
    prev_secs: u64,
    current_secs: u64,
    max_secs: u64,
}

impl FibonacciBackoff {
    /// Create a backoff starting at `min` and never exceeding `max`.
    ///
    /// A zero `min` is raised to one second so the sequence always grows;
    /// `max` is raised to `min` if it is smaller.
    #[must_use]
    pub fn new(min: Duration, max: Duration) -> Self {
        let min_secs = min.as_secs().max(1);
        let max_secs = max.as_secs().max(min_secs);
        Self {
            min_secs,
            prev_secs: 0,
            current_secs: min_secs,
            max_secs,
        }
    }

    /// Return the current delay and advance the sequence
    pub fn next_backoff(&mut self) -> Duration {
        let result = self.current_secs;

        let next = self.prev_secs.saturating_add(self.current_secs);
        self.prev_secs = self.current_secs;
        self.current_secs = next.min(self.max_secs);

        Duration::from_secs(result)
    }

    /// Reset the backoff to the initial state
    pub fn reset(&mut self) {
        self.prev_secs = 0;
        self.current_secs = self.min_secs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(backoff: &mut FibonacciBackoff) -> u64 {
        backoff.next_backoff().as_secs()
    }

    #[test]
    fn test_fibonacci_backoff_sequence() {
        let mut backoff = FibonacciBackoff::new(Duration::from_secs(5), Duration::from_secs(300));

        assert_eq!(secs(&mut backoff), 5);
        assert_eq!(secs(&mut backoff), 5);
        assert_eq!(secs(&mut backoff), 10);
        assert_eq!(secs(&mut backoff), 15);
        assert_eq!(secs(&mut backoff), 25);
        assert_eq!(secs(&mut backoff), 40);
    }

    #[test]
    fn test_fibonacci_backoff_max_cap() {
        let mut backoff = FibonacciBackoff::new(Duration::from_secs(60), Duration::from_secs(200));

        assert_eq!(secs(&mut backoff), 60);
        assert_eq!(secs(&mut backoff), 60);
        assert_eq!(secs(&mut backoff), 120);
        assert_eq!(secs(&mut backoff), 180);
        // 300 is capped
        assert_eq!(secs(&mut backoff), 200);
        assert_eq!(secs(&mut backoff), 200);
    }

    #[test]
    fn test_fibonacci_backoff_reset() {
        let mut backoff = FibonacciBackoff::new(Duration::from_secs(1), Duration::from_secs(10));

        assert_eq!(secs(&mut backoff), 1);
        assert_eq!(secs(&mut backoff), 1);
        assert_eq!(secs(&mut backoff), 2);
        assert_eq!(secs(&mut backoff), 3);

        backoff.reset();

        assert_eq!(secs(&mut backoff), 1);
        assert_eq!(secs(&mut backoff), 1);
        assert_eq!(secs(&mut backoff), 2);
    }

    #[test]
    fn test_degenerate_bounds() {
        let mut backoff = FibonacciBackoff::new(Duration::ZERO, Duration::ZERO);
        assert_eq!(secs(&mut backoff), 1);
        assert_eq!(secs(&mut backoff), 1);
        assert_eq!(secs(&mut backoff), 1);
    }
}
