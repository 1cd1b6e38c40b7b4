//! HTTP server initialization and runtime setup.
//!
//! Handles storage and cache setup, the access worker, and the Axum server lifecycle.

use crate::application::access_worker::run_access_worker;
use crate::config::{Config, StorageBackend};
use crate::domain::repositories::MappingRepository;
use crate::infrastructure::cache::{NullCache, RedirectCache, RedisCache};
use crate::infrastructure::persistence::{InMemoryMappingRepository, PgMappingRepository};
use crate::routes::{RateLimit, app_router};
use crate::state::AppState;
use crate::utils::code_generator::CodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// How long queued accesses may take to drain after the server stops.
const ACCESS_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the HTTP server with the given configuration.
///
/// Initializes the mapping store (PostgreSQL with migrations, or in-memory), the
/// redirect cache (Redis, or disabled), the background access worker, and the
/// Axum server. Returns after a shutdown signal once queued accesses are drained.
///
/// # Errors
///
/// Returns an error if the database is unreachable, migrations fail, or the
/// listener cannot be bound.
pub async fn run(config: Config) -> Result<()> {
    let repository = connect_store(&config).await?;
    let cache = connect_cache(&config).await;

    let (access_tx, access_rx) = mpsc::channel(config.access_queue_capacity);

    let generator = Arc::new(
        CodeGenerator::new(config.code_length).with_max_attempts(config.code_max_attempts),
    );

    let state = AppState::new(repository, cache, access_tx, generator)
        .with_base_url(config.base_url.clone())
        .with_behind_proxy(config.behind_proxy);

    let worker = tokio::spawn(run_access_worker(
        access_rx,
        state.access_tracker.clone(),
        config.access_worker_concurrency,
    ));
    tracing::info!(
        concurrency = config.access_worker_concurrency,
        "Access worker started"
    );

    let app = app_router(
        state,
        RateLimit {
            per_second: config.rate_limit_per_second,
            burst: config.rate_limit_burst,
        },
    )?;

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router (and with it the last access sender) is gone; the worker now
    // finishes whatever is still queued.
    match tokio::time::timeout(ACCESS_DRAIN_TIMEOUT, worker).await {
        Ok(Ok(())) => tracing::info!("Access queue drained"),
        Ok(Err(e)) => tracing::error!(error = %e, "Access worker panicked"),
        Err(_) => tracing::warn!("Timed out draining access queue"),
    }

    Ok(())
}

async fn connect_store(config: &Config) -> Result<Arc<dyn MappingRepository>> {
    match config.storage_backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; mappings are lost on restart");
            Ok(Arc::new(InMemoryMappingRepository::new()))
        }
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres storage backend")?;

            let pool = connect_pool(config, database_url).await?;

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");

            Ok(Arc::new(PgMappingRepository::new(Arc::new(pool))))
        }
    }
}

/// Opens the PostgreSQL pool using the configured limits.
pub async fn connect_pool(config: &Config, database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = config.db_max_connections,
        "Connected to database"
    );

    Ok(pool)
}

/// Connects to Redis when configured, falling back to no caching on failure.
async fn connect_cache(config: &Config) -> Arc<dyn RedirectCache> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Redirect cache disabled");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(redis) => {
            tracing::info!("Redirect cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Redis unavailable, redirect cache disabled");
            Arc::new(NullCache::new())
        }
    }
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
