//! Aggregate run report and verdict.

use serde::Serialize;
use std::net::SocketAddr;
use uuid::Uuid;

use crate::outcome::OutcomeCounts;

/// Everything a run produced, in one serializable record.
///
/// The verdict is `passed`: no hard failure among the fired requests, a
/// complete outcome set, and (for the stress scenario) a confirmed
/// post-swap success.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub scenario: &'static str,
    pub endpoint: SocketAddr,
    pub iterations: usize,
    pub peak_concurrency: usize,
    pub counts: OutcomeCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<bool>,
    pub elapsed_ms: u64,
    pub passed: bool,
}

impl RunReport {
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            scenario = self.scenario,
            endpoint = %self.endpoint,
            iterations = self.iterations,
            success = self.counts.success,
            tolerated = self.counts.tolerated(),
            hard = self.counts.hard(),
            peak_concurrency = self.peak_concurrency,
            confirmation = ?self.confirmation,
            elapsed_ms = self.elapsed_ms,
            verdict = if self.passed { "PASS" } else { "FAIL" },
            "Run finished"
        );
    }
}
