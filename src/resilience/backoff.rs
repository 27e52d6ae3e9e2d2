//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

use crate::resilience::retry::RetryPolicy;

/// Delay before retry attempt `attempt` (1-based), growing exponentially
/// from the policy's base, capped at its maximum, with up to 10% jitter so
/// repeated attempts don't land in lockstep.
pub fn delay_for(policy: &RetryPolicy, attempt: u32) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let exponent = 2u64.saturating_pow(attempt - 1);
    let delay_ms = policy
        .base_delay_ms
        .saturating_mul(exponent)
        .min(policy.max_delay_ms);

    let jitter_range = delay_ms / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(delay_ms + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay_ms: 100,
            max_delay_ms: 1000,
        }
    }

    #[test]
    fn delays_grow_and_cap() {
        let p = policy();
        assert_eq!(delay_for(&p, 0), Duration::ZERO);
        assert!(delay_for(&p, 1).as_millis() >= 100);
        assert!(delay_for(&p, 2).as_millis() >= 200);

        let capped = delay_for(&p, 10);
        assert!(capped.as_millis() >= 1000);
        assert!(capped.as_millis() <= 1100);
    }
}
