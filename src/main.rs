use std::path::PathBuf;

use clap::Parser;

use urlshort::config::{load_config, validate_config, ConfigError, ServerConfig};
use urlshort::http::{default_mux, HttpServer};
use urlshort::lifecycle::{bind, build_app, Shutdown};
use urlshort::observability::init_logging;

#[derive(Parser)]
#[command(name = "urlshort")]
#[command(about = "Redirect request paths to configured URLs", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override redirects.file (YAML or JSON).
    #[arg(short, long)]
    redirects: Option<PathBuf>,

    /// Abort startup if the redirect file fails to decode.
    #[arg(long)]
    strict: bool,
}

impl Cli {
    fn apply(&self, config: &mut ServerConfig) {
        if let Some(bind) = &self.bind {
            config.listener.bind_address = bind.clone();
        }
        if let Some(file) = &self.redirects {
            config.redirects.file = Some(file.clone());
        }
        if self.strict {
            config.redirects.strict = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    cli.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    init_logging(&config.observability)?;

    tracing::info!("urlshort v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        redirect_file = ?config.redirects.file,
        strict = config.redirects.strict,
        "Configuration loaded"
    );

    let app = build_app(&config.redirects, default_mux())?;
    let listener = bind(&config.listener).await?;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, app);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
