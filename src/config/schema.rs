//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the harness.
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default matching the reference scenario: a pool of 100
//! workers, one-second deadlines, and 1000 iterations.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for a harness run.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HarnessConfig {
    /// Worker pool bounds.
    pub dispatcher: DispatcherConfig,

    /// Per-request deadlines.
    pub timeouts: TimeoutConfig,

    /// Scenario shape (iteration count, target path, swap point).
    pub run: RunConfig,

    /// Post-swap confirmation request policy.
    pub confirmation: ConfirmationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Bounded dispatcher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Maximum number of requests in flight at once. Submissions beyond
    /// this are rejected immediately; there is no admission queue.
    pub max_concurrency: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 100,
        }
    }
}

/// Deadlines applied to every request, each independently configurable.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// TCP connection establishment timeout in milliseconds.
    pub connect_ms: u64,

    /// Timeout for each read of the response (head or body frame) in
    /// milliseconds.
    pub read_ms: u64,

    /// Total request timeout in milliseconds, covering connect through
    /// the final body byte.
    pub request_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_ms: 1000,
            read_ms: 1000,
            request_ms: 1000,
        }
    }
}

impl TimeoutConfig {
    pub fn connect(&self) -> Duration {
        Duration::from_millis(self.connect_ms)
    }

    pub fn read(&self) -> Duration {
        Duration::from_millis(self.read_ms)
    }

    pub fn request(&self) -> Duration {
        Duration::from_millis(self.request_ms)
    }
}

/// Stress scenario shape.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of requests fired at the endpoint (N).
    pub iterations: usize,

    /// Request path, also the route the serving endpoint installs.
    pub target_path: String,

    /// Submission index at which the endpoint swap is triggered. Must be
    /// strictly less than `iterations` so the swap lands inside the
    /// fan-out. Defaults to `iterations / 2` when absent.
    pub swap_after: Option<usize>,

    /// Port to bind the endpoint on; 0 selects an ephemeral port.
    pub port: u16,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            target_path: "/foo".to_string(),
            swap_after: None,
            port: 0,
        }
    }
}

impl RunConfig {
    /// The effective swap trigger index.
    pub fn swap_point(&self) -> usize {
        self.swap_after.unwrap_or(self.iterations / 2)
    }
}

/// Policy for the post-swap confirmation request.
///
/// Mirrors the connect-storm recovery expectation: a fresh request against
/// the serving endpoint must succeed, tolerating a bounded number of
/// timeouts while pooled connections from the closed era drain out.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Attempts before the confirmation is declared failed.
    pub max_attempts: u32,

    /// Base delay for exponential backoff between attempts, milliseconds.
    pub base_delay_ms: u64,

    /// Ceiling for the backoff delay, milliseconds.
    pub max_delay_ms: u64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level directive (trace, debug, info, warn, error), overridden
    /// by `RUST_LOG` when set.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_scenario() {
        let config = HarnessConfig::default();
        assert_eq!(config.dispatcher.max_concurrency, 100);
        assert_eq!(config.timeouts.connect_ms, 1000);
        assert_eq!(config.timeouts.read_ms, 1000);
        assert_eq!(config.timeouts.request_ms, 1000);
        assert_eq!(config.run.iterations, 1000);
        assert_eq!(config.run.target_path, "/foo");
        assert_eq!(config.confirmation.max_attempts, 3);
    }

    #[test]
    fn swap_point_defaults_to_midpoint() {
        let run = RunConfig::default();
        assert_eq!(run.swap_point(), 500);

        let pinned = RunConfig {
            swap_after: Some(10),
            ..RunConfig::default()
        };
        assert_eq!(pinned.swap_point(), 10);
    }

    #[test]
    fn minimal_toml_fills_defaults() {
        let config: HarnessConfig = toml::from_str("[run]\niterations = 50\n").unwrap();
        assert_eq!(config.run.iterations, 50);
        assert_eq!(config.dispatcher.max_concurrency, 100);
        assert_eq!(config.run.target_path, "/foo");
    }
}
