//! Request failure taxonomy.
//!
//! The cause of every failed request must be distinguishable by the caller:
//! the classifier tolerates anything attributable to a dead or overloaded
//! endpoint and escalates everything else as a genuine defect.

use thiserror::Error;

use crate::engine::phase::PhaseError;

/// Which deadline expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutKind {
    /// TCP connect did not complete in time.
    Connect,
    /// A read of the response head or a body frame stalled.
    Read,
    /// The request as a whole exceeded its total deadline.
    Request,
}

impl std::fmt::Display for TimeoutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeoutKind::Connect => write!(f, "connect"),
            TimeoutKind::Read => write!(f, "read"),
            TimeoutKind::Request => write!(f, "request"),
        }
    }
}

/// Terminal error for a single request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The endpoint could not be reached (refused, unroutable, or the
    /// connection died before the response head arrived).
    #[error("connection failed: {0}")]
    Connect(String),

    /// A configured deadline expired.
    #[error("{0} timeout expired")]
    Timeout(TimeoutKind),

    /// The bounded dispatcher had no free worker slot.
    #[error("rejected by dispatcher: worker pool saturated")]
    Rejected,

    /// The response head was accepted but the body stream broke.
    #[error("transfer failed mid-stream: {0}")]
    Transfer(String),

    /// The transport delivered events the phase machine cannot accept.
    #[error("protocol violation: {0}")]
    Phase(#[from] PhaseError),

    /// Anything outside the expected failure envelope: a task panic, a
    /// malformed request we built ourselves, a defect in the pool.
    #[error("internal fault: {0}")]
    Internal(String),
}

pub type RequestResult = Result<crate::engine::response::CollectedResponse, RequestError>;
