//! Redirect subsystem.
//!
//! # Data Flow
//! ```text
//! HashMap<path, url>            bytes (YAML / JSON)
//!     → table.rs (PathMap)          → decode.rs (Vec<Entry>, DecodeError)
//!                                   → table.rs (EntryList)
//!     → handler.rs (Redirect<T, S> service)
//!
//! Per request:
//!     uri().path() → RedirectTable::lookup
//!         hit  → 301 + Location
//!         miss → fallback service
//! ```
//!
//! # Design Decisions
//! - Tables are frozen at build time and shared through `Arc`
//! - Exact string match on the raw URI path, nothing else
//! - Structured builders always hand back a handler, even alongside an error
//! - Handlers are plain tower services, so they nest around any axum `Router`

pub mod decode;
pub mod handler;
pub mod table;

pub use decode::{DecodeError, Format, RecordError};
pub use handler::{json_handler, map_handler, structured_handler, yaml_handler, Built, Redirect};
pub use table::{Entry, EntryList, PathMap, RedirectTable};
