//! Account service — CLI entry point
//!
//! ```sh
//! # Run with default config (~/.config/account-service/config.toml)
//! account-service
//!
//! # Custom config path and port
//! account-service --config /etc/account-service/config.toml --port 8080
//!
//! # Validate config without starting
//! account-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use account_service::config::{default_config_path, AppConfig};
use account_service::server::{init_tracing, ServerHandle, ServerOptions};

/// Account registration, login and profile REST service.
#[derive(Parser, Debug)]
#[command(name = "account-service", version, about)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "ACCOUNT_SERVICE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            // Tracing is not configured yet; fall back to defaults for output.
            init_tracing(&AppConfig::default());
            error!("{}", e);
            return Err(e.into());
        }
    };

    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    if cli.check {
        info!("Configuration is valid");
        return Ok(());
    }

    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    handle.wait().await;
    Ok(())
}
