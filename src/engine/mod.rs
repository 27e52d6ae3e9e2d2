//! Async request engine subsystem.
//!
//! # Data Flow
//! ```text
//! submit(seq, url)
//!     → client.rs (build GET, send via pooled transport)
//!     → phase.rs (Idle → Sent → StatusReceived → HeadersReceived
//!                 → BodyReceiving* → Completed | Failed)
//!     → response.rs (immutable CollectedResponse on completion)
//!     → error.rs (distinguishable failure kind otherwise)
//! ```
//!
//! # Design Decisions
//! - One transport event drives one phase transition; out-of-order or
//!   duplicate events are errors, not no-ops
//! - `Completed` is only reachable after every body frame has been
//!   accumulated, in arrival order
//! - Deadlines are layered: connect at the connector, read per frame,
//!   request around the whole call

pub mod client;
pub mod error;
pub mod phase;
pub mod response;

pub use client::{RequestEngine, RequestHandle};
pub use error::{RequestError, RequestResult, TimeoutKind};
pub use response::CollectedResponse;
