//! Graduation registration service CLI server
//!
//! ```sh
//! # Run with default config ($GRAD_CONFIG or ~/.config/grad-registration/config.toml)
//! grad-registration
//!
//! # Custom config path
//! grad-registration --config /etc/grad-registration/config.toml
//!
//! # Throwaway in-memory store on another port
//! grad-registration --backend memory --port 8080
//!
//! # Validate config without starting
//! grad-registration --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use grad_registration::config::{AppConfig, StorageBackend};
use grad_registration::server::{init_tracing, ServerHandle};

/// Registration service for graduation ceremonies.
#[derive(Parser, Debug)]
#[command(
    name = "grad-registration",
    version,
    about = "Graduation ceremony registration service",
    long_about = "REST API for registering participants to graduation ceremonies, \
                  with per-event capacity limits and an admin report.\n\n\
                  Default config: $GRAD_CONFIG or ~/.config/grad-registration/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Override the storage backend (sqlite, memory).
    #[arg(long)]
    backend: Option<StorageBackend>,

    /// Validate the configuration and exit without starting the server.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .unwrap_or_else(grad_registration::default_config_path);

    let loaded = AppConfig::load(&config_path);
    let mut config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => AppConfig::default(),
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(backend) = cli.backend {
        config.database.backend = backend;
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        if let Err(e) = loaded.and_then(|_| config.validate()) {
            eprintln!("Configuration is invalid: {}", e);
            std::process::exit(1);
        }
        println!("Configuration is valid");
        println!("   Config file  : {}", config_path.display());
        println!("   Listen       : {}", config.listen_address());
        println!("   Environment  : {}", config.server.environment);
        println!("   Backend      : {}", config.database.backend);
        if config.database.backend == StorageBackend::Sqlite {
            println!("   Database     : {}", config.database.connection_url());
        }
        println!("   Capacity     : {}", config.registration.standard_capacity);
        println!("   Unlimited    : {:?}", config.registration.unlimited_event_ids);
        println!("   Events file  : {}", config.seed.events_file);
        println!("   Log level    : {}", config.logging.level);
        return Ok(());
    }

    // Init tracing first so subsequent logs are formatted properly
    init_tracing(&config);
    match loaded {
        Ok(_) => info!("Configuration loaded from {}", config_path.display()),
        Err(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(config).await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
