//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → HarnessConfig (validated, immutable)
//!     → shared by value with the orchestrator
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; a run never observes a config change
//! - All fields have defaults so the harness runs with no config file at all
//! - Validation separates syntactic (serde) from semantic checks and
//!   reports every violation, not just the first

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::ConfirmationConfig;
pub use schema::DispatcherConfig;
pub use schema::HarnessConfig;
pub use schema::RunConfig;
pub use schema::TimeoutConfig;
