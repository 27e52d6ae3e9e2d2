//! Metrics emission.
//!
//! Counters are no-ops unless the embedding process installs a recorder;
//! the harness itself does not expose a scrape endpoint.

use std::time::Duration;

use crate::outcome::Outcome;

/// Count one settled request by scenario and outcome kind.
pub fn record_outcome(scenario: &'static str, outcome: &Outcome) {
    metrics::counter!(
        "harness_requests_total",
        "scenario" => scenario,
        "outcome" => outcome.label()
    )
    .increment(1);
}

/// Record the endpoint swap completing.
pub fn record_swap() {
    metrics::counter!("harness_endpoint_swaps_total").increment(1);
}

/// Record a finished run.
pub fn record_run(scenario: &'static str, passed: bool, elapsed: Duration) {
    metrics::counter!(
        "harness_runs_total",
        "scenario" => scenario,
        "verdict" => if passed { "pass" } else { "fail" }
    )
    .increment(1);
    metrics::histogram!("harness_run_duration_seconds", "scenario" => scenario)
        .record(elapsed.as_secs_f64());
}
