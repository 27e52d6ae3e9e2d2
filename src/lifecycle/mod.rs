//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Run start:
//!     bind endpoint → spawn serving task on swap → run scenario
//!
//! Run end (shutdown.rs):
//!     orchestrator triggers shutdown → serving task drains → join
//! ```
//!
//! The endpoint state outlives every request in the run; it is created at
//! run start and torn down here at run end.

pub mod shutdown;

pub use shutdown::Shutdown;
