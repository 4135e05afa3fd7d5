//! Bounded retry with deterministic exponential backoff.

use std::time::Duration;

use crate::config::{DEFAULT_BACKOFF_BASE, DEFAULT_MAX_ATTEMPTS};

/// Retry schedule for transient download failures.
///
/// Attempts are 1-indexed. After failed attempt `n` with attempts
/// remaining, the next try waits `base * 2^(n-1)` — 1s, 2s, 4s, ... with
/// the default base. The schedule is deterministic: the run is strictly
/// sequential, so there is no retry herd to spread out with jitter.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use gpc_harvester::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.next_delay(1), Some(Duration::from_secs(1)));
/// assert_eq!(policy.next_delay(2), Some(Duration::from_secs(2)));
/// assert_eq!(policy.next_delay(3), None);
/// ```
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial attempt).
    max_attempts: u32,

    /// Base delay for the first retry.
    backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_base: DEFAULT_BACKOFF_BASE,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with explicit attempt and backoff settings.
    ///
    /// `max_attempts` is clamped to at least 1.
    #[must_use]
    pub fn new(max_attempts: u32, backoff_base: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_base,
        }
    }

    /// Returns the configured number of attempts, including the first.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the wait before the next attempt, or `None` when
    /// `failed_attempt` was the last one allowed.
    #[must_use]
    pub fn next_delay(&self, failed_attempt: u32) -> Option<Duration> {
        if failed_attempt >= self.max_attempts {
            return None;
        }
        Some(self.backoff_delay(failed_attempt))
    }

    /// Backoff wait after failed attempt `attempt`: `base * 2^(attempt-1)`.
    ///
    /// The exponent is capped so pathological attempt counts cannot
    /// overflow the multiplier.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.backoff_base.saturating_mul(2u32.pow(exponent))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_values() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.backoff_base, Duration::from_secs(1));
    }

    #[test]
    fn test_max_attempts_minimum_is_one() {
        let policy = RetryPolicy::new(0, Duration::from_secs(1));
        assert_eq!(policy.max_attempts(), 1);
    }

    #[test]
    fn test_delays_double_each_attempt() {
        let policy = RetryPolicy::new(5, Duration::from_secs(1));
        assert_eq!(policy.next_delay(1), Some(Duration::from_secs(1)));
        assert_eq!(policy.next_delay(2), Some(Duration::from_secs(2)));
        assert_eq!(policy.next_delay(3), Some(Duration::from_secs(4)));
        assert_eq!(policy.next_delay(4), Some(Duration::from_secs(8)));
    }

    #[test]
    fn test_no_delay_once_attempts_exhausted() {
        let policy = RetryPolicy::new(3, Duration::from_secs(1));
        assert_eq!(policy.next_delay(3), None);
        assert_eq!(policy.next_delay(7), None);
    }

    #[test]
    fn test_custom_base_scales_schedule() {
        let policy = RetryPolicy::new(4, Duration::from_millis(250));
        assert_eq!(policy.next_delay(1), Some(Duration::from_millis(250)));
        assert_eq!(policy.next_delay(2), Some(Duration::from_millis(500)));
        assert_eq!(policy.next_delay(3), Some(Duration::from_millis(1000)));
    }

    #[test]
    fn test_exponent_cap_prevents_overflow() {
        let policy = RetryPolicy::new(u32::MAX, Duration::from_secs(1));
        // Far past the cap; must not panic and must stay monotonic-capped.
        assert_eq!(
            policy.next_delay(40),
            Some(Duration::from_secs(1 << 16))
        );
    }
}
