//! Single-shot sanity scenario: a serving endpoint answers one request
//! with 200 "hello".

use swapstorm::endpoint::{EndpointController, PAYLOAD};
use swapstorm::run::run_sanity;

mod common;

#[tokio::test]
async fn sanity_scenario_passes() {
    let config = common::harness_config(1, 10);

    let report = run_sanity(&config).await.unwrap();

    assert!(report.passed);
    assert_eq!(report.counts.success, 1);
    assert_eq!(report.counts.hard(), 0);
    assert_eq!(report.iterations, 1);
}

#[tokio::test]
async fn serving_endpoint_returns_fixed_payload() {
    let controller = EndpointController::serve(0, "/foo").await.unwrap();
    let base = format!("http://{}", controller.addr());

    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let response = client.get(format!("{base}/foo")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), PAYLOAD);

    // Anything off the target path is not served.
    let response = client.get(format!("{base}/bar")).send().await.unwrap();
    assert_eq!(response.status(), 404);

    controller.shutdown().await;
}
