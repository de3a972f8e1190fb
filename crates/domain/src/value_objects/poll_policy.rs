//! Poll Policy - bounds for the status polling loop
//!
//! The loop waits `interval` before every attempt and gives up after
//! `max_attempts`, so a job that never finishes is abandoned after
//! `interval * max_attempts`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::DomainError;

/// Configuration for polling a long-running operation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollPolicy {
    /// Fixed wait before each status query
    pub interval: Duration,
    /// Hard ceiling on status queries
    pub max_attempts: u32,
    /// Delay suggested to callers when the operation is not registered yet
    pub retry_hint: Duration,
    /// How long an uninterrupted run of "not found" answers is tolerated
    pub not_found_grace: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_attempts: 60,
            retry_hint: Duration::from_secs(15),
            not_found_grace: Duration::from_secs(120),
        }
    }
}

impl PollPolicy {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.interval.is_zero() {
            return Err(DomainError::validation("interval must be greater than 0"));
        }
        if self.max_attempts == 0 {
            return Err(DomainError::validation(
                "max_attempts must be greater than 0",
            ));
        }
        if self.retry_hint.is_zero() {
            return Err(DomainError::validation("retry_hint must be greater than 0"));
        }
        Ok(())
    }

    /// Longest time the loop can run before timing out
    pub fn ceiling(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ceiling_is_ten_minutes() {
        let policy = PollPolicy::default();
        assert!(policy.validate().is_ok());
        assert_eq!(policy.ceiling(), Duration::from_secs(600));
    }

    #[test]
    fn zero_values_are_rejected() {
        let policy = PollPolicy {
            interval: Duration::ZERO,
            ..Default::default()
        };
        assert!(policy.validate().is_err());

        let policy = PollPolicy {
            max_attempts: 0,
            ..Default::default()
        };
        assert!(policy.validate().is_err());

        let policy = PollPolicy {
            retry_hint: Duration::ZERO,
            ..Default::default()
        };
        assert!(policy.validate().is_err());
    }
}
