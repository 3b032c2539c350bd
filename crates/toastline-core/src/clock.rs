#![forbid(unsafe_code)]

//! Deterministic monotonic clock controlled by the host.
//!
//! The engine never reads wall-clock time for scheduling. The embedding
//! environment advances this clock explicitly (from `requestAnimationFrame`,
//! a native frame callback, or a test), which keeps every timer decision
//! reproducible.

use core::time::Duration;

/// Host-advanced monotonic clock starting at zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time.
    ///
    /// Moving backwards is ignored; the clock is monotonic.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(DeterministicClock::new().now(), Duration::ZERO);
    }

    #[test]
    fn advance_accumulates() {
        let mut clock = DeterministicClock::new();
        clock.advance(Duration::from_millis(16));
        clock.advance(Duration::from_millis(16));
        assert_eq!(clock.now(), Duration::from_millis(32));
    }

    #[test]
    fn set_never_goes_backwards() {
        let mut clock = DeterministicClock::new();
        clock.set(Duration::from_millis(100));
        clock.set(Duration::from_millis(40));
        assert_eq!(clock.now(), Duration::from_millis(100));
    }
}
