//! Exponential retry delay for the change poller.

use std::time::Duration;

use super::config::PollerConfig;

/// Tracks consecutive poll failures and yields the next retry delay.
///
/// The n-th consecutive failure waits `initial * multiplier^(n-1)`, capped at
/// `max`. A successful poll resets the sequence.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    multiplier: f64,
    failures: u32,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration, multiplier: f64) -> Self {
        Self {
            initial,
            max,
            multiplier,
            failures: 0,
        }
    }

    pub fn from_config(config: &PollerConfig) -> Self {
        Self::new(
            config.initial_backoff,
            config.max_backoff,
            config.backoff_multiplier,
        )
    }

    /// Record a failure and return how long to wait before retrying.
    pub fn next_delay(&mut self) -> Duration {
        self.failures = self.failures.saturating_add(1);
        let factor = self.multiplier.powi((self.failures - 1).min(i32::MAX as u32) as i32);
        let delay_ms = self.initial.as_millis() as f64 * factor;
        Duration::from_millis(delay_ms.min(self.max.as_millis() as f64) as u64).min(self.max)
    }

    /// Forget previous failures.
    pub fn reset(&mut self) {
        self.failures = 0;
    }

    /// Consecutive failures since the last reset.
    pub fn failures(&self) -> u32 {
        self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doubles_until_cap() {
        let mut backoff = Backoff::new(Duration::from_millis(250), Duration::from_secs(1), 2.0);

        assert_eq!(backoff.next_delay(), Duration::from_millis(250));
        assert_eq!(backoff.next_delay(), Duration::from_millis(500));
        assert_eq!(backoff.next_delay(), Duration::from_secs(1));
        assert_eq!(backoff.next_delay(), Duration::from_secs(1));
        assert_eq!(backoff.failures(), 4);
    }

    #[test]
    fn test_reset() {
        let mut backoff = Backoff::from_config(&PollerConfig::default());
        backoff.next_delay();
        backoff.next_delay();
        backoff.reset();

        assert_eq!(backoff.failures(), 0);
        assert_eq!(backoff.next_delay(), Duration::from_millis(250));
    }

    #[test]
    fn test_default_cap_is_thirty_seconds() {
        let mut backoff = Backoff::from_config(&PollerConfig::default());
        let last = (0..200).map(|_| backoff.next_delay()).last().unwrap();
        assert_eq!(last, Duration::from_secs(30));
    }
}
