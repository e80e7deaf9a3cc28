//! HTTP server lifecycle: startup checks, optional migrations, serving and
//! graceful shutdown.

use tokio::net::TcpListener;
use tokio::signal;

use crate::api::routes::create_router;
use crate::config::{Environment, settings::Settings};
use crate::db::{MigrationAction, MigrationOutcome, establish_async_connection_pool, run_migrations};
use crate::error::{AppError, AppResult};
use crate::external::build_image_host;
use crate::state::AppState;

pub struct Server {
    settings: Settings,
    environment: Environment,
}

impl Server {
    pub fn new(settings: Settings, environment: Environment) -> Self {
        Self {
            settings,
            environment,
        }
    }

    /// Serves until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    /// - Invalid JWT settings
    /// - Migration or connection pool failures
    /// - The address cannot be bound
    pub async fn run(self) -> AppResult<()> {
        let settings = &self.settings;

        tracing::info!(
            app_name = %settings.application.name,
            app_version = %settings.application.version,
            environment = %self.environment,
            "Application starting"
        );
        tracing::info!(
            host = %settings.server.host,
            port = settings.server.port,
            cors_origins = ?settings.server.cors_origins,
            "Server configuration loaded"
        );
        tracing::info!(
            max_connections = settings.database.max_connections,
            min_connections = settings.database.min_connections,
            auto_migrate = settings.database.auto_migrate,
            "Database configuration loaded"
        );

        settings.jwt.validate().inspect_err(|e| {
            tracing::error!(error = %e, "JWT configuration validation failed");
        })?;
        tracing::info!(
            access_token_expiration = settings.jwt.access_token_expiration,
            refresh_token_expiration = settings.jwt.refresh_token_expiration,
            "JWT configuration validated"
        );

        if settings.database.auto_migrate
            && let MigrationOutcome::Applied(names) =
                run_migrations(&settings.database.url, MigrationAction::Apply).await?
        {
            tracing::info!(applied = names.len(), migrations = ?names, "Migrations applied");
        }

        let pool = establish_async_connection_pool(&settings.database).await?;
        tracing::info!("Database connection pool initialized");

        let image_host = build_image_host(&settings.image_host);
        tracing::info!(image_host = image_host.name(), "Image host configured");

        let state = AppState::new(pool, settings.jwt.clone(), image_host);
        let router = create_router(state, &settings.server, self.environment);

        let address = settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            AppError::Internal {
                source: anyhow::anyhow!("Failed to bind to {}: {}", address, e),
            }
        })?;
        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::Internal {
                source: anyhow::Error::from(e),
            })?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Resolves on Ctrl+C or SIGTERM. A handler that cannot be installed never
/// resolves, leaving the other one in charge.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, initiating graceful shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, initiating graceful shutdown"),
    }
}
