//! Server runtime.
//!
//! [`ServerHandle`] owns the full lifecycle: metrics recorder, storage
//! backend, startup seeding, the REST API and graceful shutdown.
//!
//! ```rust,no_run
//! use grad_registration::config::AppConfig;
//! use grad_registration::server::ServerHandle;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let handle = ServerHandle::start(AppConfig::default()).await?;
//!     handle.install_signal_handler();
//!     handle.shutdown_signal().wait().await;
//!     handle.wait().await;
//!     Ok(())
//! }
//! ```

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::application::EventImportService;
use crate::config::{AppConfig, StorageBackend};
use crate::domain::RepositoryProvider;
use crate::infrastructure::{init_and_migrate, InMemoryRepositoryProvider, SeaOrmRepositoryProvider};
use crate::interfaces::http::{create_api_router, AppState};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

/// Install the global tracing subscriber from the logging section.
///
/// `RUST_LOG` takes precedence over `logging.level`.
pub fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let result = if config.logging.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("tracing subscriber already installed: {}", e);
    }
}

/// The global metrics recorder can only be installed once per process;
/// later starts reuse the first handle.
fn prometheus_handle() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    if let Some(handle) = PROM_HANDLE.get() {
        return Ok(handle.clone());
    }
    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("Prometheus metrics recorder installed");
    Ok(PROM_HANDLE.get_or_init(|| handle).clone())
}

/// Handle to a running registration server.
pub struct ServerHandle {
    /// Repository provider for data access.
    pub repos: Arc<dyn RepositoryProvider>,
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Address the API is bound to.
    pub local_addr: SocketAddr,

    db: Option<DatabaseConnection>,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Start the server.
    ///
    /// 1. Install the Prometheus recorder
    /// 2. Open the configured storage backend (SQLite runs migrations)
    /// 3. Seed an empty event store, if enabled
    /// 4. Bind and serve the REST API
    pub async fn start(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        config.validate()?;
        info!("Starting graduation registration service...");

        let metrics = prometheus_handle()?;

        // ── Storage ────────────────────────────────────────────
        let (repos, db): (Arc<dyn RepositoryProvider>, Option<DatabaseConnection>) =
            match config.database.backend {
                StorageBackend::Sqlite => {
                    let db = init_and_migrate(&config.database.to_database_config()).await?;
                    (Arc::new(SeaOrmRepositoryProvider::new(db.clone())), Some(db))
                }
                StorageBackend::Memory => {
                    warn!("Using in-memory storage; registrations are lost on restart");
                    (Arc::new(InMemoryRepositoryProvider::new()), None)
                }
            };
        info!("Storage backend: {}", repos.backend());

        // ── Seeding ────────────────────────────────────────────
        if config.seed.on_startup {
            let importer = EventImportService::new(repos.clone(), &config.seed.events_file);
            let seeded = importer.seed_on_startup().await?;
            if seeded > 0 {
                info!("Seeded {} events on startup", seeded);
            }
        }

        let policy = config.registration.policy();
        info!(
            standard_capacity = policy.standard_capacity(),
            unlimited_event_ids = ?policy.unlimited_event_ids().collect::<Vec<_>>(),
            "Capacity policy"
        );

        // ── REST API ───────────────────────────────────────────
        let state = AppState::new(
            repos.clone(),
            policy,
            &config.seed.events_file,
            config.is_development(),
            metrics,
        );
        let router = create_api_router(state);

        let listener = tokio::net::TcpListener::bind(config.listen_address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let shutdown = ShutdownCoordinator::new(config.server.shutdown_timeout);
        let api_shutdown = shutdown.signal();
        let api_server = axum::serve(listener, router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            repos,
            config,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown without waiting.
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the server to stop after shutdown has been triggered.
    ///
    /// In-flight requests get `server.shutdown_timeout` seconds to finish.
    pub async fn wait(self) {
        info!("Waiting for server tasks to complete...");

        let Self {
            db,
            shutdown,
            api_task,
            ..
        } = self;

        let finished = shutdown
            .run_cleanup(move || async move {
                match api_task.await {
                    Ok(()) => info!("REST API server stopped"),
                    Err(e) => error!("REST API server task panicked: {}", e),
                }
            })
            .await;
        if !finished {
            warn!("Shutdown timed out with requests still in flight");
        }

        if let Some(db) = db {
            if let Err(e) = db.close().await {
                warn!("Error closing database connection: {}", e);
            } else {
                info!("Database connection closed");
            }
        }

        info!("Shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("Shutting down...");
        self.trigger_shutdown();
        self.wait().await;
    }
}
