//! Run orchestrator: drives the two entry scenarios.

use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::time::sleep;
use url::Url;
use uuid::Uuid;

use crate::config::schema::HarnessConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::dispatch::{BoundedDispatcher, DispatchError};
use crate::endpoint::{server, EndpointController, EndpointError};
use crate::engine::{RequestEngine, RequestError};
use crate::observability::metrics;
use crate::outcome::{Classifier, Outcome, OutcomeLedger};
use crate::resilience::{backoff, retry, RetryPolicy};
use crate::run::report::RunReport;

pub const SCENARIO_SANITY: &str = "sanity";
pub const SCENARIO_STRESS: &str = "stress";

/// Error type for run setup. Request-level failures never surface here;
/// they become outcomes.
#[derive(Debug, Error)]
pub enum RunError {
    /// The configuration violates semantic constraints.
    #[error("invalid configuration: {0:?}")]
    InvalidConfig(Vec<ValidationError>),

    /// The endpoint could not be set up or swapped.
    #[error("endpoint setup failed: {0}")]
    Endpoint(#[from] EndpointError),

    /// The target address does not form a valid URL.
    #[error("invalid target url: {0}")]
    TargetUrl(#[from] url::ParseError),
}

/// Single-shot sanity check: install a serving endpoint, issue one
/// request, expect 200 with the fixed payload.
pub async fn run_sanity(config: &HarnessConfig) -> Result<RunReport, RunError> {
    validate_config(config).map_err(RunError::InvalidConfig)?;
    let started = Instant::now();
    let run_id = Uuid::new_v4();

    let controller = EndpointController::serve(config.run.port, &config.run.target_path).await?;
    let url = target_url(&controller, &config.run.target_path)?;

    tracing::info!(run_id = %run_id, address = %controller.addr(), "Sanity run starting");

    let engine = Arc::new(RequestEngine::new(config.timeouts));
    let classifier = Classifier::new(server::PAYLOAD);
    let ledger = OutcomeLedger::new();

    let result = engine.submit(0, &url).wait().await;
    let outcome = classifier.classify(0, result);
    metrics::record_outcome(SCENARIO_SANITY, &outcome);
    let passed = outcome.is_success();
    if let Err(e) = ledger.record(0, outcome) {
        tracing::error!(error = %e, "outcome aggregation corrupted");
    }

    controller.shutdown().await;

    let report = RunReport {
        run_id,
        scenario: SCENARIO_SANITY,
        endpoint: controller.addr(),
        iterations: 1,
        peak_concurrency: 1,
        counts: ledger.counts(),
        confirmation: None,
        elapsed_ms: started.elapsed().as_millis() as u64,
        passed,
    };
    metrics::record_run(SCENARIO_SANITY, report.passed, started.elapsed());
    report.log_summary();
    Ok(report)
}

/// Stress scenario: fire N requests at a Closed endpoint, swap it to
/// Serving from inside the fan-out, collect all N outcomes, then confirm
/// the serving endpoint with one more request.
///
/// Verdict: every one of the N outcomes is Success or Tolerated, the
/// outcome set is complete and uncorrupted, and the confirmation succeeds.
pub async fn run_stress(config: &HarnessConfig) -> Result<RunReport, RunError> {
    validate_config(config).map_err(RunError::InvalidConfig)?;
    let started = Instant::now();
    let run_id = Uuid::new_v4();
    let iterations = config.run.iterations;
    let swap_point = config.run.swap_point();

    let controller = EndpointController::bind(config.run.port, &config.run.target_path).await?;
    let url = target_url(&controller, &config.run.target_path)?;

    tracing::info!(
        run_id = %run_id,
        address = %controller.addr(),
        iterations,
        swap_after = swap_point,
        max_concurrency = config.dispatcher.max_concurrency,
        "Stress run starting"
    );

    let engine = Arc::new(RequestEngine::new(config.timeouts));
    let dispatcher = BoundedDispatcher::new(config.dispatcher.max_concurrency);
    let classifier = Arc::new(Classifier::new(server::PAYLOAD));
    let ledger = Arc::new(OutcomeLedger::new());

    let mut seqs = Vec::new();
    let mut handles = Vec::new();

    for seq in 0..iterations as u32 {
        if seq as usize == swap_point {
            controller.swap().await?;
        }

        let task = {
            let engine = Arc::clone(&engine);
            let classifier = Arc::clone(&classifier);
            let ledger = Arc::clone(&ledger);
            let url = url.clone();
            async move {
                let result = engine.execute(seq, &url).await;
                let outcome = classifier.classify(seq, result);
                settle(&ledger, seq, outcome, iterations);
            }
        };

        match dispatcher.try_dispatch(task) {
            Ok(handle) => {
                seqs.push(seq);
                handles.push(handle);
            }
            Err(DispatchError::Rejected(_)) => {
                let outcome = classifier.classify(seq, Err(RequestError::Rejected));
                settle(&ledger, seq, outcome, iterations);
            }
        }

        // Let workers start so submissions overlap completions and the swap.
        tokio::task::yield_now().await;
    }

    // Join barrier: after this, no further ledger writes can arrive.
    for (seq, joined) in seqs.into_iter().zip(join_all(handles).await) {
        if let Err(e) = joined {
            let outcome = classifier.classify(
                seq,
                Err(RequestError::Internal(format!(
                    "request worker aborted: {e}"
                ))),
            );
            settle(&ledger, seq, outcome, iterations);
        }
    }

    let counts = ledger.counts();
    let complete = counts.total() == iterations && !ledger.is_poisoned();
    if !complete {
        tracing::error!(
            settled = counts.total(),
            expected = iterations,
            poisoned = ledger.is_poisoned(),
            "outcome set incomplete or corrupted"
        );
    }
    for (seq, fault) in ledger.hard_faults() {
        tracing::error!(seq, fault = %fault, "hard failure");
    }

    let confirmed = confirm(
        &engine,
        &url,
        &classifier,
        RetryPolicy::from(&config.confirmation),
        iterations as u32,
    )
    .await;

    controller.shutdown().await;

    let report = RunReport {
        run_id,
        scenario: SCENARIO_STRESS,
        endpoint: controller.addr(),
        iterations,
        peak_concurrency: dispatcher.peak(),
        counts,
        confirmation: Some(confirmed),
        elapsed_ms: started.elapsed().as_millis() as u64,
        passed: counts.hard() == 0 && complete && confirmed,
    };
    metrics::record_run(SCENARIO_STRESS, report.passed, started.elapsed());
    report.log_summary();
    Ok(report)
}

/// Record one settled request: metrics, progress marker, ledger slot.
fn settle(ledger: &OutcomeLedger, seq: u32, outcome: Outcome, total: usize) {
    metrics::record_outcome(SCENARIO_STRESS, &outcome);
    tracing::debug!(seq, outcome = outcome.label(), "request settled");
    match ledger.record(seq, outcome) {
        Ok(done) if done % 100 == 0 || done == total => {
            tracing::info!(settled = done, total, "progress");
        }
        Ok(_) => {}
        Err(e) => tracing::error!(seq, error = %e, "outcome aggregation corrupted"),
    }
}

/// One fresh request against the serving endpoint, expected to succeed.
/// Timeouts are retried under the policy while stale connections from the
/// closed era drain out; anything else is conclusive.
async fn confirm(
    engine: &Arc<RequestEngine>,
    url: &Url,
    classifier: &Classifier,
    policy: RetryPolicy,
    base_seq: u32,
) -> bool {
    let mut attempt = 0;
    loop {
        attempt += 1;
        let seq = base_seq + (attempt - 1);
        let result = engine.submit(seq, url).wait().await;

        if attempt < policy.max_attempts && retry::is_retryable(&result) {
            let delay = backoff::delay_for(&policy, attempt);
            tracing::info!(attempt, delay = ?delay, "confirmation attempt timed out; retrying");
            sleep(delay).await;
            continue;
        }

        let outcome = classifier.classify(seq, result);
        metrics::record_outcome(SCENARIO_STRESS, &outcome);
        return if outcome.is_success() {
            tracing::info!(attempt, "confirmation request succeeded");
            true
        } else {
            tracing::error!(attempt, outcome = outcome.label(), "confirmation request failed");
            false
        };
    }
}

fn target_url(controller: &EndpointController, path: &str) -> Result<Url, url::ParseError> {
    Url::parse(&format!("http://{}{}", controller.addr(), path))
}
