//! Cart Cache - session-scoped shopping cart service
//!
//! Serves the cart HTTP API over either the in-process cache or Redis.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cart_cache::api::{create_router, AppState};
use cart_cache::cache::{KeyValueCache, MemoryCache, RedisCache};
use cart_cache::config::{CacheBackend, Config};
use cart_cache::{spawn_cleanup_task, CartStore};

/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect the configured cache backend
/// 4. Start the expiry sweep (memory backend only)
/// 5. Serve the router until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cart_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Cart Cache Server");

    let config = Config::from_env().context("loading configuration")?;
    info!(
        "Configuration loaded: backend={:?}, cart_ttl={}s, key_prefix={}, port={}",
        config.backend, config.cart_ttl, config.key_prefix, config.server_port
    );

    let (cache, cleanup_handle): (Arc<dyn KeyValueCache>, Option<JoinHandle<()>>) =
        match config.backend {
            CacheBackend::Memory => {
                let memory = MemoryCache::new(config.max_entries);
                let handle = spawn_cleanup_task(memory.store(), config.cleanup_interval);
                (Arc::new(memory), Some(handle))
            }
            CacheBackend::Redis => {
                let redis = RedisCache::connect(&config.redis_url, config.cache_timeout())
                    .await
                    .with_context(|| format!("connecting to Redis at {}", config.redis_url))?;
                (Arc::new(redis), None)
            }
        };

    let carts = CartStore::from_config(cache, &config);
    let cache_connected = carts.is_connected().await;
    info!(cache_connected, "Cart store initialized");

    let app = create_router(AppState::new(carts));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM, then stops the expiry sweep if one runs.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Expiry sweep aborted");
    }
}
