//! Endpoint-swap stress harness for async HTTP client connection pools.
//!
//! The harness fires a large number of concurrent GET requests at a port
//! whose backing endpoint changes mid-run, from a bound-but-never-accepted
//! socket to a live HTTP server, and verifies that every request settles in
//! exactly one well-defined outcome.
//!
//! # Architecture Overview
//!
//! ```text
//!  ┌────────────┐   try_dispatch   ┌──────────┐   GET /foo    ┌──────────┐
//!  │    run     │─────────────────▶│ dispatch │──────────────▶│  engine  │
//!  │orchestrator│                  │ (bounded │               │ (request │
//!  └─────┬──────┘                  │  pool)   │               │  phases) │
//!        │                         └──────────┘               └────┬─────┘
//!        │ swap mid-flight                                         │
//!        ▼                                                         ▼
//!  ┌────────────┐                                            ┌──────────┐
//!  │  endpoint  │  Closed ──swap──▶ Serving                  │ outcome  │
//!  │ controller │  (same port, exactly once)                 │classifier│
//!  └────────────┘                                            │ + ledger │
//!                                                            └──────────┘
//! ```
//!
//! The crux property: a race between in-flight connections and the endpoint
//! identity change must never corrupt the client's bookkeeping for
//! subsequent, unrelated requests. Expected chaos (dead socket, saturated
//! pool) is tolerated; anything else fails the run loudly.

// Core subsystems
pub mod config;
pub mod dispatch;
pub mod endpoint;
pub mod engine;
pub mod outcome;
pub mod run;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::schema::HarnessConfig;
pub use lifecycle::Shutdown;
pub use run::report::RunReport;
