//! Probe retry policy.
//!
//! # Responsibilities
//! - Decide whether another probe attempt is allowed
//! - Compute exponential backoff with jitter between attempts
//!
//! # Design Decisions
//! - `max_attempts = 1` is the baseline: one probe, no retry
//! - Jitter is 0 to 10% of the capped delay

use std::time::Duration;

use rand::Rng;

use crate::config::StartupConfig;

/// How many times to probe and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// A single attempt, never retried.
    pub fn once() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    pub fn from_config(config: &StartupConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }

    /// Whether another attempt may follow attempt number `attempt` (1-based).
    pub fn allows_retry_after(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let factor = 2u32.saturating_pow(attempt - 1);
        let capped = self.base_delay.saturating_mul(factor).min(self.max_delay);

        let jitter_range = capped.as_millis() as u64 / 10;
        let jitter = if jitter_range > 0 {
            rand::thread_rng().gen_range(0..jitter_range)
        } else {
            0
        };

        capped + Duration::from_millis(jitter)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::once()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(max_attempts: u32, base_ms: u64, max_ms: u64) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(base_ms),
            max_delay: Duration::from_millis(max_ms),
        }
    }

    #[test]
    fn baseline_never_retries() {
        let once = RetryPolicy::once();
        assert!(!once.allows_retry_after(1));
        assert_eq!(RetryPolicy::default(), once);
    }

    #[test]
    fn retries_up_to_max_attempts() {
        let p = policy(3, 100, 2000);
        assert!(p.allows_retry_after(1));
        assert!(p.allows_retry_after(2));
        assert!(!p.allows_retry_after(3));
    }

    #[test]
    fn delay_grows_and_caps() {
        let p = policy(10, 100, 1000);
        let d1 = p.delay_after(1);
        assert!(d1 >= Duration::from_millis(100) && d1 < Duration::from_millis(110));

        let d2 = p.delay_after(2);
        assert!(d2 >= Duration::from_millis(200) && d2 < Duration::from_millis(220));

        let capped = p.delay_after(10);
        assert!(capped >= Duration::from_millis(1000) && capped < Duration::from_millis(1100));
    }

    #[test]
    fn zero_attempts_in_config_means_one() {
        let config = StartupConfig {
            max_attempts: 0,
            ..StartupConfig::default()
        };
        assert_eq!(RetryPolicy::from_config(&config).max_attempts, 1);
    }
}
