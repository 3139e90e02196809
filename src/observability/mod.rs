//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → request spans (TraceLayer) tagged with x-request-id
//!
//! logging.rs installs the global subscriber:
//!     RUST_LOG or config log_level → EnvFilter
//!     → pretty or JSON fmt layer → stdout
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through every request span
//! - Redirect hits log at debug, misses at trace

pub mod logging;

pub use logging::init_logging;
