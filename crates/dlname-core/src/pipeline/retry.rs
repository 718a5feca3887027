use std::time::Duration;

use crate::config::RetryConfig;

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Give up on this download.
    NoRetry,
    /// Look again after the given delay.
    RetryAfter(Duration),
}

/// Bounded, fixed-delay policy for waiting on a host-assigned filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(RetryConfig::default())
    }
}

impl From<RetryConfig> for RetryPolicy {
    fn from(cfg: RetryConfig) -> Self {
        Self {
            max_attempts: cfg.max_attempts.max(1),
            delay: cfg.delay(),
        }
    }
}

impl RetryPolicy {
    /// `attempt` is 1-based (1 = first attempt).
    pub fn decide(&self, attempt: u32) -> RetryDecision {
        if attempt >= self.max_attempts {
            RetryDecision::NoRetry
        } else {
            RetryDecision::RetryAfter(self.delay)
        }
    }
}
