//! Retry policy for the post-swap confirmation request.

use crate::config::schema::ConfirmationConfig;
use crate::engine::{RequestError, RequestResult};

/// Bounded retry policy.
///
/// A fresh request against the just-installed server may still time out
/// while stale pooled connections from the closed era drain; those attempts
/// are repeated. Any other failure is conclusive and is not retried —
/// matching the tolerance envelope of the original scenario, which ignored
/// only timeouts between confirmation attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl From<&ConfirmationConfig> for RetryPolicy {
    fn from(config: &ConfirmationConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: config.max_delay_ms,
        }
    }
}

/// Whether a failed attempt should be repeated under this policy.
pub fn is_retryable(result: &RequestResult) -> bool {
    matches!(result, Err(RequestError::Timeout(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TimeoutKind;

    #[test]
    fn only_timeouts_are_retryable() {
        assert!(is_retryable(&Err(RequestError::Timeout(
            TimeoutKind::Request
        ))));
        assert!(!is_retryable(&Err(RequestError::Connect("refused".into()))));
        assert!(!is_retryable(&Err(RequestError::Rejected)));
        assert!(!is_retryable(&Err(RequestError::Internal("bug".into()))));
    }

    #[test]
    fn policy_copies_confirmation_config() {
        let config = ConfirmationConfig::default();
        let policy = RetryPolicy::from(&config);
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay_ms, 100);
    }
}
