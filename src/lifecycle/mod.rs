//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Init logging → Build redirect app → Bind
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C or Shutdown::trigger → Stop accepting → Drain requests → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, listener last
//! - Redirect decode failures degrade to fallback unless `strict` is set

pub mod shutdown;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{bind, build_app, StartupError};
