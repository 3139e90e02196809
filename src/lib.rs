//! URL shortener: path-based HTTP redirects.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (request ID, trace, timeout)
//!                         │
//!                         ▼
//!                     redirect::Redirect<EntryList, _>   (YAML / JSON file)
//!                         │ miss
//!                         ▼
//!                     redirect::Redirect<PathMap, _>     (inline paths)
//!                         │ miss
//!                         ▼
//!                     http::fallback::default_mux
//! ```
//!
//! The `redirect` module is usable on its own: every handler is a
//! `tower::Service` wrapping another one, so it can sit in front of any axum
//! `Router`.
//!
//! ```no_run
//! use std::collections::HashMap;
//! use urlshort::http::default_mux;
//! use urlshort::redirect::{map_handler, yaml_handler};
//!
//! let paths = HashMap::from([(
//!     "/urlshort-godoc".to_string(),
//!     "https://godoc.org/github.com/gophercises/urlshort".to_string(),
//! )]);
//! let map = map_handler(paths, default_mux());
//!
//! let yml = b"- path: /urlshort\n  url: https://github.com/gophercises/urlshort\n";
//! let handler = yaml_handler(yml, map).into_result().expect("valid YAML");
//! let app: axum::Router = axum::Router::new().fallback_service(handler);
//! # let _ = app;
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod redirect;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
