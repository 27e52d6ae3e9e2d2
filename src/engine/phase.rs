//! Per-request phase machine.
//!
//! Every request walks `Idle → Sent → StatusReceived → HeadersReceived →
//! BodyReceiving* → Completed`, or drops into `Failed` from any non-terminal
//! phase. Each transition is driven by exactly one transport event, and an
//! event arriving in the wrong phase is a protocol violation surfaced as an
//! error — never silently ignored, since it means the transport delivered
//! duplicate or out-of-order callbacks and the client's bookkeeping can no
//! longer be trusted.

use axum::http::{HeaderMap, StatusCode};
use bytes::{Bytes, BytesMut};
use thiserror::Error;

use crate::engine::response::CollectedResponse;

/// Discrete phases of a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Sent,
    StatusReceived,
    HeadersReceived,
    BodyReceiving,
    Completed,
    Failed,
}

impl Phase {
    /// Terminal phases accept no further events.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed)
    }
}

/// An event arrived in a phase that does not accept it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("request {seq}: illegal {event:?} event in phase {phase:?}")]
pub struct PhaseError {
    pub seq: u32,
    pub phase: Phase,
    pub event: &'static str,
}

/// Mutable state for one request, owned by the engine until terminal.
#[derive(Debug)]
pub struct RequestState {
    seq: u32,
    phase: Phase,
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: BytesMut,
}

impl RequestState {
    pub fn new(seq: u32) -> Self {
        Self {
            seq,
            phase: Phase::Idle,
            status: None,
            headers: HeaderMap::new(),
            body: BytesMut::new(),
        }
    }

    pub fn seq(&self) -> u32 {
        self.seq
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn illegal(&self, event: &'static str) -> PhaseError {
        PhaseError {
            seq: self.seq,
            phase: self.phase,
            event,
        }
    }

    /// The request left the client: `Idle → Sent`.
    pub fn on_sent(&mut self) -> Result<(), PhaseError> {
        match self.phase {
            Phase::Idle => {
                self.phase = Phase::Sent;
                Ok(())
            }
            _ => Err(self.illegal("sent")),
        }
    }

    /// Status line arrived: `Sent → StatusReceived`.
    pub fn on_status(&mut self, status: StatusCode) -> Result<(), PhaseError> {
        match self.phase {
            Phase::Sent => {
                self.status = Some(status);
                self.phase = Phase::StatusReceived;
                Ok(())
            }
            _ => Err(self.illegal("status")),
        }
    }

    /// Header block arrived: `StatusReceived → HeadersReceived`.
    pub fn on_headers(&mut self, headers: &HeaderMap) -> Result<(), PhaseError> {
        match self.phase {
            Phase::StatusReceived => {
                self.headers = headers.clone();
                self.phase = Phase::HeadersReceived;
                Ok(())
            }
            _ => Err(self.illegal("headers")),
        }
    }

    /// A body frame arrived. First frame moves `HeadersReceived →
    /// BodyReceiving`; further frames self-loop. Frames append in arrival
    /// order.
    pub fn on_chunk(&mut self, chunk: Bytes) -> Result<(), PhaseError> {
        match self.phase {
            Phase::HeadersReceived | Phase::BodyReceiving => {
                self.body.extend_from_slice(&chunk);
                self.phase = Phase::BodyReceiving;
                Ok(())
            }
            _ => Err(self.illegal("body-chunk")),
        }
    }

    /// End of stream. Only legal once every frame has been accumulated;
    /// yields the immutable response.
    pub fn on_complete(&mut self) -> Result<CollectedResponse, PhaseError> {
        match self.phase {
            Phase::HeadersReceived | Phase::BodyReceiving => {
                let Some(status) = self.status.take() else {
                    return Err(self.illegal("completed"));
                };
                self.phase = Phase::Completed;
                Ok(CollectedResponse {
                    status,
                    headers: std::mem::take(&mut self.headers),
                    body: self.body.split().freeze(),
                })
            }
            _ => Err(self.illegal("completed")),
        }
    }

    /// Drop into `Failed` from any non-terminal phase. Returns false if the
    /// request had already terminated.
    pub fn fail(&mut self) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        self.phase = Phase::Failed;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_headers_received(seq: u32) -> RequestState {
        let mut state = RequestState::new(seq);
        state.on_sent().unwrap();
        state.on_status(StatusCode::OK).unwrap();
        state.on_headers(&HeaderMap::new()).unwrap();
        state
    }

    #[test]
    fn happy_path_accumulates_chunks_in_order() {
        let mut state = to_headers_received(7);
        state.on_chunk(Bytes::from_static(b"he")).unwrap();
        state.on_chunk(Bytes::from_static(b"llo")).unwrap();

        let response = state.on_complete().unwrap();
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body.as_ref(), b"hello");
    }

    #[test]
    fn empty_body_completes_from_headers_received() {
        let mut state = to_headers_received(1);
        let response = state.on_complete().unwrap();
        assert!(response.body.is_empty());
        assert_eq!(state.phase(), Phase::Completed);
    }

    #[test]
    fn status_before_sent_is_a_violation() {
        let mut state = RequestState::new(0);
        let err = state.on_status(StatusCode::OK).unwrap_err();
        assert_eq!(err.phase, Phase::Idle);
        assert_eq!(err.event, "status");
    }

    #[test]
    fn duplicate_status_is_a_violation() {
        let mut state = RequestState::new(0);
        state.on_sent().unwrap();
        state.on_status(StatusCode::OK).unwrap();
        let err = state.on_status(StatusCode::OK).unwrap_err();
        assert_eq!(err.phase, Phase::StatusReceived);
    }

    #[test]
    fn complete_before_headers_is_a_violation() {
        let mut state = RequestState::new(0);
        state.on_sent().unwrap();
        state.on_status(StatusCode::OK).unwrap();
        let err = state.on_complete().unwrap_err();
        assert_eq!(err.event, "completed");
    }

    #[test]
    fn chunk_after_failure_is_a_violation() {
        let mut state = to_headers_received(3);
        assert!(state.fail());
        let err = state.on_chunk(Bytes::from_static(b"x")).unwrap_err();
        assert_eq!(err.phase, Phase::Failed);
    }

    #[test]
    fn fail_is_single_shot() {
        let mut state = RequestState::new(0);
        assert!(state.fail());
        assert!(!state.fail());
        assert_eq!(state.phase(), Phase::Failed);
    }
}
