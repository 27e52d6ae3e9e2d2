//! Configuration validation.
//!
//! Semantic checks on top of what serde already guarantees syntactically.
//! All violations are collected and reported together.

use thiserror::Error;

use crate::config::schema::HarnessConfig;

/// A single semantic violation in the configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The worker pool must admit at least one request.
    #[error("dispatcher.max_concurrency must be at least 1")]
    ZeroConcurrency,

    /// A run of zero requests verifies nothing.
    #[error("run.iterations must be at least 1")]
    ZeroIterations,

    /// Every deadline must be finite and positive to keep the run bounded.
    #[error("timeouts.{0} must be greater than 0")]
    ZeroTimeout(&'static str),

    /// Route paths are absolute.
    #[error("run.target_path must start with '/', got {0:?}")]
    TargetPathNotAbsolute(String),

    /// The swap must land inside the fan-out, not after it.
    #[error("run.swap_after ({swap_after}) must be less than run.iterations ({iterations})")]
    SwapAfterOutOfRange {
        swap_after: usize,
        iterations: usize,
    },

    /// The confirmation request needs at least one attempt.
    #[error("confirmation.max_attempts must be at least 1")]
    ZeroConfirmationAttempts,
}

/// Validate a configuration, returning every violation found.
pub fn validate_config(config: &HarnessConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.dispatcher.max_concurrency == 0 {
        errors.push(ValidationError::ZeroConcurrency);
    }

    if config.run.iterations == 0 {
        errors.push(ValidationError::ZeroIterations);
    }

    if config.timeouts.connect_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_ms"));
    }
    if config.timeouts.read_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("read_ms"));
    }
    if config.timeouts.request_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("request_ms"));
    }

    if !config.run.target_path.starts_with('/') {
        errors.push(ValidationError::TargetPathNotAbsolute(
            config.run.target_path.clone(),
        ));
    }

    if let Some(swap_after) = config.run.swap_after {
        if config.run.iterations > 0 && swap_after >= config.run.iterations {
            errors.push(ValidationError::SwapAfterOutOfRange {
                swap_after,
                iterations: config.run.iterations,
            });
        }
    }

    if config.confirmation.max_attempts == 0 {
        errors.push(ValidationError::ZeroConfirmationAttempts);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
