//! Shared utilities for integration tests.

use swapstorm::HarnessConfig;

/// A harness config sized for CI: short deadlines keep dead-socket
/// requests from stretching the run.
pub fn harness_config(iterations: usize, max_concurrency: usize) -> HarnessConfig {
    let mut config = HarnessConfig::default();
    config.run.iterations = iterations;
    config.dispatcher.max_concurrency = max_concurrency;
    config.timeouts.connect_ms = 500;
    config.timeouts.read_ms = 500;
    config.timeouts.request_ms = 500;
    config
}
