//! Startup orchestration.
//!
//! # Responsibilities
//! - Compose the redirect handlers around the fallback
//! - Bind the listener
//!
//! # Design Decisions
//! - File entries take precedence over inline paths
//! - A redirect file that fails to decode is fatal only in strict mode;
//!   otherwise the surviving entries are served and the error is logged

use std::fs;
use std::path::PathBuf;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ListenerConfig, RedirectsConfig};
use crate::redirect::{map_handler, structured_handler, DecodeError, RedirectTable};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read redirect file {path:?}: {source}")]
    ReadRedirects {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot infer format of redirect file {0:?}")]
    UnknownFormat(PathBuf),

    #[error("redirect file {path:?} is invalid: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Build the request-serving app: file entries → inline paths → `fallback`.
pub fn build_app(config: &RedirectsConfig, fallback: Router) -> Result<Router, StartupError> {
    let inline = map_handler(config.paths.clone(), fallback);
    tracing::info!(count = inline.table().len(), "Inline redirects loaded");
    let app = Router::new().fallback_service(inline);

    let Some(path) = &config.file else {
        return Ok(app);
    };

    let format = config
        .file_format()
        .ok_or_else(|| StartupError::UnknownFormat(path.clone()))?;
    let data = fs::read(path).map_err(|source| StartupError::ReadRedirects {
        path: path.clone(),
        source,
    })?;

    let (handler, error) = structured_handler(&data, format, app).into_parts();
    match error {
        Some(source) if config.strict => {
            return Err(StartupError::Decode {
                path: path.clone(),
                source,
            });
        }
        Some(e) => {
            tracing::error!(
                path = ?path,
                error = %e,
                surviving = handler.table().len(),
                "Redirect file failed to decode, serving remaining entries"
            );
        }
        None => {
            tracing::info!(
                path = ?path,
                format = %format,
                count = handler.table().len(),
                "Redirect file loaded"
            );
        }
    }

    Ok(Router::new().fallback_service(handler))
}

/// Bind the TCP listener.
pub async fn bind(config: &ListenerConfig) -> Result<TcpListener, StartupError> {
    let listener = TcpListener::bind(&config.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.bind_address.clone(),
            source,
        })?;

    if let Ok(addr) = listener.local_addr() {
        tracing::info!(address = %addr, "Listening for connections");
    }
    Ok(listener)
}
