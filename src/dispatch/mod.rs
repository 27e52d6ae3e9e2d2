//! Bounded dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! try_dispatch(task)
//!     → pool.rs (try_acquire a worker permit, zero admission queue)
//!     → permit held  → task spawned, permit released on settle
//!     → no permit    → typed Rejected error, caller resolves the
//!                      request with a rejection outcome
//! ```
//!
//! # Design Decisions
//! - Admission is synchronous hand-off only: a submission either gets a
//!   worker immediately or is rejected; nothing queues unboundedly
//! - Rejection is a typed error, never a generic I/O failure, so the
//!   classifier can tolerate it
//! - Permits are RAII guards; a panicking task still frees its slot

pub mod pool;

pub use pool::{BoundedDispatcher, DispatchError};
