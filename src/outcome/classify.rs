//! Ordered outcome classification.

use axum::http::StatusCode;

use crate::engine::{RequestError, RequestResult};
use crate::outcome::{HardFault, Outcome, ToleratedReason};

/// Classifies terminal request results against the expected response.
///
/// Rules apply in order:
/// 1. expected status and exact payload → `Success`
/// 2. any other status or body → `Hard(ProtocolMismatch)`
/// 3. connect failure, timeout, pool rejection, or broken transfer →
///    `Tolerated`
/// 4. everything else → `Hard(Internal)`, reported loudly — it indicates a
///    bug outside the expected failure envelope
#[derive(Debug, Clone)]
pub struct Classifier {
    expected_status: StatusCode,
    expected_payload: String,
}

impl Classifier {
    pub fn new(expected_payload: impl Into<String>) -> Self {
        Self {
            expected_status: StatusCode::OK,
            expected_payload: expected_payload.into(),
        }
    }

    pub fn classify(&self, seq: u32, result: RequestResult) -> Outcome {
        match result {
            Ok(response) => {
                if response.status == self.expected_status
                    && response.body.as_ref() == self.expected_payload.as_bytes()
                {
                    Outcome::Success(response)
                } else {
                    tracing::warn!(
                        seq,
                        status = %response.status,
                        body = %response.body_preview(),
                        "response does not match expected payload"
                    );
                    Outcome::Hard(HardFault::ProtocolMismatch {
                        status: response.status,
                        body: response.body_preview(),
                    })
                }
            }
            Err(RequestError::Connect(msg)) => {
                Outcome::Tolerated(ToleratedReason::ConnectFailed(msg))
            }
            Err(RequestError::Timeout(kind)) => Outcome::Tolerated(ToleratedReason::TimedOut(kind)),
            Err(RequestError::Rejected) => Outcome::Tolerated(ToleratedReason::PoolRejected),
            Err(RequestError::Transfer(msg)) => {
                Outcome::Tolerated(ToleratedReason::TransferBroken(msg))
            }
            Err(err @ (RequestError::Phase(_) | RequestError::Internal(_))) => {
                // The whole reason this harness exists: a failure that is
                // not attributable to the endpoint means the client's own
                // bookkeeping broke under the race.
                tracing::error!(seq, error = %err, "request failed outside the expected failure envelope");
                Outcome::Hard(HardFault::Internal(err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;
    use bytes::Bytes;
    use crate::engine::phase::{Phase, PhaseError};
    use crate::engine::{CollectedResponse, TimeoutKind};

    fn response(status: StatusCode, body: &'static str) -> CollectedResponse {
        CollectedResponse {
            status,
            headers: HeaderMap::new(),
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    fn classifier() -> Classifier {
        Classifier::new("hello")
    }

    #[test]
    fn expected_response_is_success() {
        let outcome = classifier().classify(0, Ok(response(StatusCode::OK, "hello")));
        assert!(outcome.is_success());
    }

    #[test]
    fn wrong_body_is_a_protocol_mismatch() {
        let outcome = classifier().classify(0, Ok(response(StatusCode::OK, "goodbye")));
        assert!(outcome.is_hard());
        assert_eq!(outcome.label(), "protocol_mismatch");
    }

    #[test]
    fn wrong_status_is_a_protocol_mismatch() {
        let outcome = classifier().classify(0, Ok(response(StatusCode::NOT_FOUND, "hello")));
        assert_eq!(outcome.label(), "protocol_mismatch");
    }

    #[test]
    fn endpoint_attributable_failures_are_tolerated() {
        let c = classifier();
        for (result, label) in [
            (
                Err(RequestError::Connect("refused".into())),
                "connect_failed",
            ),
            (
                Err(RequestError::Timeout(TimeoutKind::Request)),
                "timed_out",
            ),
            (Err(RequestError::Rejected), "pool_rejected"),
            (
                Err(RequestError::Transfer("reset".into())),
                "transfer_broken",
            ),
        ] {
            let outcome = c.classify(0, result);
            assert!(!outcome.is_hard(), "{label} must be tolerated");
            assert_eq!(outcome.label(), label);
        }
    }

    #[test]
    fn phase_violations_are_internal_faults() {
        let err = RequestError::Phase(PhaseError {
            seq: 9,
            phase: Phase::Completed,
            event: "headers",
        });
        let outcome = classifier().classify(9, Err(err));
        assert_eq!(outcome.label(), "internal_fault");
    }

    #[test]
    fn unexpected_errors_are_internal_faults() {
        let outcome = classifier().classify(0, Err(RequestError::Internal("task aborted".into())));
        assert!(outcome.is_hard());
        assert_eq!(outcome.label(), "internal_fault");
    }
}
