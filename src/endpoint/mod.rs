//! Endpoint lifecycle subsystem.
//!
//! # Data Flow
//! ```text
//! bind(port)
//!     → controller.rs (listener bound, never accepted → state Closed)
//!
//! swap()   — exactly once per run
//!     → close the unaccepted listener
//!     → server.rs (bind an HTTP server to the identical port)
//!     → state Serving, published atomically to all observers
//!
//! teardown
//!     → lifecycle::Shutdown drains the serving task
//! ```
//!
//! # Design Decisions
//! - Observers only ever see Closed or Serving; the transition is
//!   mutex-serialized and published through an atomic swap
//! - A request in flight at the moment of swap may fail cleanly against
//!   the old socket or be served by the new one; both are correct
//! - A second swap attempt is a typed error, not a silent no-op

pub mod controller;
pub mod server;
pub mod state;

pub use controller::{EndpointController, EndpointError};
pub use server::PAYLOAD;
pub use state::EndpointState;
