//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use tokio::net::TcpListener;
use urlshort::config::ServerConfig;
use urlshort::http::HttpServer;
use urlshort::lifecycle::Shutdown;

/// Start the server on an ephemeral port. Call `Shutdown::trigger` to stop it.
pub async fn start_server(config: ServerConfig, app: Router) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, app);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// HTTP client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

/// Write `content` to a uniquely named file in the temp directory.
#[allow(dead_code)]
pub fn write_temp(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("urlshort-it-{}-{}", std::process::id(), name));
    std::fs::write(&path, content).unwrap();
    path
}
