//! HTTP server initialization and runtime setup.
//!
//! Wires the database pool, migrations, caches, rate limiter and Axum
//! server lifecycle.

use crate::config::Config;
use crate::application::services::{LinkService, RateLimitService};
use crate::infrastructure::cache::{
    CacheService, MemoryCounterStore, NullCache, RedisCache,
};
use crate::infrastructure::persistence::PgLinkRepository;
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::clock::SystemClock;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if the database connection, migrations, address bind or
/// server runtime fail.
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate::Migrator::new(Path::new("./migrations"))
        .await
        .context("Failed to load migrations")?
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;

    let cache: Arc<dyn CacheService> = if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url).await {
            Ok(redis) => {
                tracing::info!("Redirect cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                Arc::new(NullCache::new())
            }
        }
    } else {
        tracing::info!("Redirect cache disabled (NullCache)");
        Arc::new(NullCache::new())
    };

    let pool = Arc::new(pool);
    let link_repository = Arc::new(PgLinkRepository::new(pool.clone()));
    let link_service = Arc::new(LinkService::new(link_repository));

    // Process-wide limiter state: one counter store for the server lifetime.
    let counter_store = Arc::new(MemoryCounterStore::new(Arc::new(SystemClock)));
    let rate_limiter = Arc::new(RateLimitService::new(
        counter_store,
        config.rate_limit_per_minute,
        Duration::from_secs(config.rate_limit_window_secs),
    ));

    let state = AppState {
        db: pool,
        link_service,
        rate_limiter,
        cache,
        base_url: config.base_url.clone(),
        cache_ttl_seconds: config.cache_ttl_seconds,
        behind_proxy: config.behind_proxy,
    };

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install shutdown handler: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
