//! Default handler for requests no redirect claims.

use axum::{routing::get, Router};

/// `GET /` answers `Hello, world!`; every other path is a 404.
pub fn default_mux() -> Router {
    Router::new().route("/", get(hello))
}

async fn hello() -> &'static str {
    "Hello, world!"
}
