//! HTTP hosting subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum serve, graceful shutdown)
//!     → request.rs (assign / propagate x-request-id)
//!     → TraceLayer span, TimeoutLayer
//!     → redirect handlers (file entries → inline paths)
//!     → fallback.rs (default mux)
//! ```

pub mod fallback;
pub mod request;
pub mod server;

pub use fallback::default_mux;
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::HttpServer;
