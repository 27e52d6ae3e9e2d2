//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (per-outcome counters, run duration)
//!
//! Consumers:
//!     → stdout (human or CI log capture)
//!     → any metrics recorder the embedding process installs
//! ```
//!
//! # Design Decisions
//! - Per-request progress markers are debug-level; summaries are info-level
//! - Hard-fault detail is logged at error level before the verdict
//! - Metric updates are cheap atomic increments and are no-ops unless a
//!   recorder is installed

pub mod logging;
pub mod metrics;
