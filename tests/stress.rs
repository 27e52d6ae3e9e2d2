//! Stress scenario: a storm of requests against an endpoint that changes
//! identity mid-flight.
//!
//! The regression being guarded: a race between in-flight connections and
//! the endpoint swap must never produce an internal fault or corrupt the
//! bookkeeping of unrelated requests.

use std::sync::Arc;

use swapstorm::config::schema::TimeoutConfig;
use swapstorm::endpoint::{EndpointController, EndpointState, PAYLOAD};
use swapstorm::engine::RequestEngine;
use swapstorm::outcome::Classifier;
use swapstorm::run::run_stress;
use url::Url;

mod common;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn stress_run_survives_endpoint_swap() {
    let config = common::harness_config(1000, 100);

    let report = run_stress(&config).await.unwrap();

    // Every request settled, exactly once.
    assert_eq!(report.counts.total(), 1000);

    // Expected chaos only: never a hard failure.
    assert_eq!(
        report.counts.hard(),
        0,
        "hard failures: protocol_mismatch={} internal_fault={}",
        report.counts.protocol_mismatch,
        report.counts.internal_fault
    );

    // The serving endpoint answered the post-swap confirmation.
    assert_eq!(report.confirmation, Some(true));

    assert!(report.peak_concurrency <= 100);
    assert!(report.passed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn tiny_pool_bounds_concurrency_and_rejects_overflow() {
    let config = common::harness_config(50, 2);

    let report = run_stress(&config).await.unwrap();

    assert!(report.peak_concurrency <= 2);
    assert!(
        report.counts.pool_rejected > 0,
        "a two-slot pool must reject most of 50 submissions"
    );
    // Rejections are tolerated, not failures.
    assert_eq!(report.counts.hard(), 0);
    assert!(report.passed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn observers_never_see_a_third_state() {
    let controller = Arc::new(EndpointController::bind(0, "/foo").await.unwrap());

    let mut observers = Vec::new();
    for _ in 0..8 {
        let controller = Arc::clone(&controller);
        observers.push(tokio::spawn(async move {
            let mut saw_serving = false;
            for _ in 0..2000 {
                match controller.state() {
                    EndpointState::Serving => saw_serving = true,
                    EndpointState::Closed if saw_serving => {
                        return Err("observed Closed after Serving");
                    }
                    EndpointState::Closed => {}
                }
                tokio::task::yield_now().await;
            }
            Ok(saw_serving)
        }));
    }

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    controller.swap().await.unwrap();

    for observer in observers {
        observer.await.unwrap().unwrap();
    }

    controller.shutdown().await;
}

#[tokio::test]
async fn confirmation_after_swap_is_idempotent() {
    let controller = EndpointController::bind(0, "/foo").await.unwrap();
    controller.swap().await.unwrap();

    let engine = Arc::new(RequestEngine::new(TimeoutConfig::default()));
    let classifier = Classifier::new(PAYLOAD);
    let url = Url::parse(&format!("http://{}/foo", controller.addr())).unwrap();

    // A fresh request always succeeds once the swap has settled, no matter
    // how many times it is repeated.
    for seq in 0..3 {
        let result = engine.submit(seq, &url).wait().await;
        let outcome = classifier.classify(seq, result);
        assert!(
            outcome.is_success(),
            "post-swap request {seq} settled as {}",
            outcome.label()
        );
    }

    controller.shutdown().await;
}
