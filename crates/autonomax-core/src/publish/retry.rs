//! Retry policy for publish attempts.
//!
//! Stateless: the worker tracks the attempt number and asks the policy
//! whether to go again and how long to wait first.

use std::time::Duration;

use autonomax_types::config::PublishSettings;
use autonomax_types::error::PublishError;

/// Exponential backoff with a cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero behaves like one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn from_settings(settings: &PublishSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            base_delay: Duration::from_millis(settings.base_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
        }
    }

    /// Whether a failure on `attempt` (1-based) earns another attempt.
    pub fn should_retry(&self, attempt: u32, error: &PublishError) -> bool {
        error.is_retryable() && attempt < self.max_attempts
    }

    /// Delay before the attempt following `attempt`: `base * 2^(attempt-1)`,
    /// capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow(attempt - 1);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}
