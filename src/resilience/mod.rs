//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! confirmation request after the swap:
//!     → retry.rs (is the failure worth another attempt?)
//!     → backoff.rs (jittered delay before the next attempt)
//! ```
//!
//! Only the confirmation request retries. The N stress requests run to a
//! single terminal outcome each; retrying them would hide exactly the
//! failures the harness exists to count.

pub mod backoff;
pub mod retry;

pub use retry::RetryPolicy;
