//! Reusable server runtime.
//!
//! [`ServerHandle`] encapsulates the full lifecycle: storage init,
//! migrations, REST API and graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::application::AccountService;
use crate::config::{AppConfig, LogFormat};
use crate::domain::AccountRepository;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{init_database, InMemoryAccountRepository, SeaOrmAccountRepository};
use crate::interfaces::http::{create_api_router, ApiState};
use crate::support::shutdown::ShutdownCoordinator;

/// Install the global tracing subscriber. `RUST_LOG` wins over the
/// configured level. Safe to call more than once; later calls are no-ops.
pub fn init_tracing(cfg: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.logging.level));

    let result = match cfg.logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
    };

    if result.is_err() {
        warn!("Tracing subscriber already installed");
    }
}

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the service.
pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running account service.
pub struct ServerHandle {
    /// Address the API is bound to (useful when port 0 was requested).
    pub local_addr: SocketAddr,
    pub config: AppConfig,

    db: Option<DatabaseConnection>,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Start the service:
    /// 1. Open storage (database + migrations, or in-memory)
    /// 2. Build the account service and router
    /// 3. Bind and serve the REST API with graceful shutdown
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;
        info!("Starting account service...");

        if app_cfg.security.uses_dev_secret() {
            warn!("Using the built-in JWT secret; set JWT_SECRET in production");
        }

        let (repo, db): (Arc<dyn AccountRepository>, Option<DatabaseConnection>) =
            if app_cfg.database.is_in_memory() {
                warn!("Accounts are stored in memory and will be lost on exit");
                let repo: Arc<dyn AccountRepository> = Arc::new(InMemoryAccountRepository::new());
                (repo, None)
            } else {
                let db = init_database(&app_cfg.database.connection()).await?;
                if opts.auto_migrate {
                    info!("Running database migrations...");
                    Migrator::up(&db, None).await?;
                    info!("Migrations completed");
                }
                let repo: Arc<dyn AccountRepository> =
                    Arc::new(SeaOrmAccountRepository::new(db.clone()));
                (repo, Some(db))
            };

        let jwt_config = app_cfg.security.jwt();
        info!(
            "JWT configured with {}h token expiration",
            jwt_config.expiration_hours
        );

        let service = Arc::new(AccountService::new(
            repo,
            jwt_config,
            app_cfg.security.bcrypt_cost,
        ));
        let router = create_api_router(ApiState::new(service, db.clone()));

        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        shutdown.start_signal_listener();

        let listener = tokio::net::TcpListener::bind(app_cfg.server.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let signal = shutdown.signal();
        let api_task = tokio::spawn(async move {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async move { signal.wait().await })
                .await;
            if let Err(e) = result {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            local_addr,
            config: app_cfg,
            db,
            shutdown,
            api_task,
        })
    }

    /// Block until a shutdown signal arrives, then stop.
    pub async fn wait(self) {
        self.shutdown.signal().wait().await;
        self.stop().await;
    }

    /// Trigger shutdown and wait for in-flight requests and the database
    /// connection to close.
    pub async fn stop(self) {
        let Self {
            db,
            shutdown,
            api_task,
            ..
        } = self;

        shutdown.signal().trigger();
        let drained = shutdown
            .drain(async {
                if let Err(e) = api_task.await {
                    error!("REST API task panicked: {}", e);
                }
            })
            .await;
        if drained {
            info!("REST API stopped");
        }

        if let Some(db) = db {
            match db.close().await {
                Ok(()) => info!("Database connection closed"),
                Err(e) => warn!("Error closing database connection: {}", e),
            }
        }

        info!("Shutdown complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 0;
        cfg.security.bcrypt_cost = 4;
        cfg
    }

    #[tokio::test]
    async fn starts_and_stops_with_in_memory_store() {
        let mut cfg = test_config();
        cfg.database.url = "memory".to_string();

        let handle = ServerHandle::start(ServerOptions {
            config: cfg,
            auto_migrate: true,
        })
        .await
        .unwrap();
        assert_ne!(handle.local_addr.port(), 0);

        handle.stop().await;
    }

    #[tokio::test]
    async fn starts_against_sqlite_and_migrates() {
        let mut cfg = test_config();
        cfg.database.url = "sqlite::memory:".to_string();
        cfg.database.max_connections = 1;

        let handle = ServerHandle::start(ServerOptions {
            config: cfg,
            auto_migrate: true,
        })
        .await
        .unwrap();

        let stream = tokio::net::TcpStream::connect(handle.local_addr).await;
        assert!(stream.is_ok());

        handle.stop().await;
    }
}
