//! # Fibonacci Backoff
//!
//! Progressive backoff for transport retries. Grows more slowly than exponential
//! backoff, so a briefly unreachable appliance is retried a few times without
//! stalling the plugin for long.
//!
//! Sequence with a 500ms base and 8s cap: 500ms, 500ms, 1s, 1.5s, 2.5s, 4s, 6.5s, 8s (max).

use std::time::Duration;

/// Fibonacci backoff calculator
///
/// Each backoff is the sum of the previous two, capped at `max`.
#[derive(Debug, Clone)]
pub struct FibonacciBackoff {
    /// Previous backoff value in milliseconds
    prev_millis: u64,
    /// Current backoff value in milliseconds
    current_millis: u64,
    /// Maximum backoff value in milliseconds
    max_millis: u64,
}

impl FibonacciBackoff {
    /// Create a new Fibonacci backoff between `min` and `max`
    #[must_use]
    pub fn new(min: Duration, max: Duration) -> Self {
        let min_millis = u64::try_from(min.as_millis()).unwrap_or(u64::MAX);
        let max_millis = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
        Self {
            prev_millis: 0,
            current_millis: min_millis,
            max_millis,
        }
    }

    /// Get the next backoff duration and advance the sequence
    pub fn next_backoff(&mut self) -> Duration {
        let result = self.current_millis;

        let next_millis = self.prev_millis.saturating_add(self.current_millis);
        self.prev_millis = self.current_millis;
        self.current_millis = std::cmp::min(next_millis, self.max_millis);

        Duration::from_millis(result)
    }
}

impl Default for FibonacciBackoff {
    fn default() -> Self {
        Self::new(Duration::from_millis(500), Duration::from_secs(8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn millis(backoff: &mut FibonacciBackoff) -> u128 {
        backoff.next_backoff().as_millis()
    }

    #[test]
    fn test_fibonacci_backoff_sequence() {
        let mut backoff = FibonacciBackoff::default();

        assert_eq!(millis(&mut backoff), 500);
        assert_eq!(millis(&mut backoff), 500);
        assert_eq!(millis(&mut backoff), 1000);
        assert_eq!(millis(&mut backoff), 1500);
        assert_eq!(millis(&mut backoff), 2500);
        assert_eq!(millis(&mut backoff), 4000);
        assert_eq!(millis(&mut backoff), 6500);
        assert_eq!(millis(&mut backoff), 8000); // capped
        assert_eq!(millis(&mut backoff), 8000);
    }

    #[test]
    fn test_fibonacci_backoff_custom_bounds() {
        let mut backoff = FibonacciBackoff::new(Duration::from_secs(1), Duration::from_secs(2));

        assert_eq!(backoff.next_backoff(), Duration::from_secs(1));
        assert_eq!(backoff.next_backoff(), Duration::from_secs(1));
        assert_eq!(backoff.next_backoff(), Duration::from_secs(2));
        assert_eq!(backoff.next_backoff(), Duration::from_secs(2));
    }
}
