//! Outcome classification subsystem.
//!
//! # Data Flow
//! ```text
//! terminal request result
//!     → classify.rs (ordered rules: success / tolerated / hard)
//!     → ledger.rs (one write-once slot per sequence number)
//!     → run orchestrator reads the full set after the join barrier
//! ```
//!
//! The ordered policy here is the harness's core business logic: it
//! separates expected chaos (dead socket, saturated pool) from genuine
//! defects (content mismatch, bookkeeping corruption).

pub mod classify;
pub mod ledger;

use axum::http::StatusCode;

use crate::engine::{CollectedResponse, TimeoutKind};

pub use classify::Classifier;
pub use ledger::{LedgerError, OutcomeCounts, OutcomeLedger};

/// Why a failure is tolerated: every variant is attributable to hitting a
/// non-listening or overloaded endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToleratedReason {
    /// The endpoint refused or dropped the connection.
    ConnectFailed(String),
    /// A deadline expired.
    TimedOut(TimeoutKind),
    /// The bounded worker pool had no free slot.
    PoolRejected,
    /// The body stream broke after the head arrived.
    TransferBroken(String),
}

impl std::fmt::Display for ToleratedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToleratedReason::ConnectFailed(msg) => write!(f, "connect failed: {msg}"),
            ToleratedReason::TimedOut(kind) => write!(f, "{kind} timeout"),
            ToleratedReason::PoolRejected => write!(f, "rejected by saturated pool"),
            ToleratedReason::TransferBroken(msg) => write!(f, "transfer broken: {msg}"),
        }
    }
}

/// A failure that fails the run: a genuine defect, not expected chaos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HardFault {
    /// The endpoint answered, but not with the expected status and payload.
    ProtocolMismatch { status: StatusCode, body: String },
    /// Anything outside the expected failure envelope.
    Internal(String),
}

impl std::fmt::Display for HardFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HardFault::ProtocolMismatch { status, body } => {
                write!(f, "protocol mismatch: status {status}, body {body:?}")
            }
            HardFault::Internal(msg) => write!(f, "internal fault: {msg}"),
        }
    }
}

/// Exactly one terminal outcome per request.
#[derive(Debug, Clone)]
pub enum Outcome {
    Success(CollectedResponse),
    Tolerated(ToleratedReason),
    Hard(HardFault),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_hard(&self) -> bool {
        matches!(self, Outcome::Hard(_))
    }

    /// Stable label for metrics and progress markers.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "success",
            Outcome::Tolerated(ToleratedReason::ConnectFailed(_)) => "connect_failed",
            Outcome::Tolerated(ToleratedReason::TimedOut(_)) => "timed_out",
            Outcome::Tolerated(ToleratedReason::PoolRejected) => "pool_rejected",
            Outcome::Tolerated(ToleratedReason::TransferBroken(_)) => "transfer_broken",
            Outcome::Hard(HardFault::ProtocolMismatch { .. }) => "protocol_mismatch",
            Outcome::Hard(HardFault::Internal(_)) => "internal_fault",
        }
    }
}
