use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use filmyfool_api::{
    api::{create_router, AppState},
    config::Config,
    db::{create_redis_client, Cache, KeyValueStore, MemoryStore, RedisStore},
    services::{
        providers::{Catalog, OmdbProvider, SnapshotCatalog},
        update::api_host_of,
        CachePolicy, DiscoveryEngine, DiscoveryPolicy, ProfileStore, SwipeSession,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "filmyfool_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting filmyfool-api v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let store: Arc<dyn KeyValueStore> = match &config.redis_url {
        Some(url) => Arc::new(RedisStore::new(create_redis_client(url)?)),
        None => {
            warn!("REDIS_URL not set, profile will not survive restarts");
            Arc::new(MemoryStore::new())
        }
    };
    info!(backend = store.name(), "Store ready");

    let (catalog, cache_writer) = match (&config.omdb_api_key, &config.snapshot_path) {
        (Some(api_key), _) => {
            let (cache, handle) = Cache::new(Arc::clone(&store));
            let provider = OmdbProvider::new(cache, api_key.clone(), config.omdb_api_url.clone());
            (Catalog::Search(Arc::new(provider)), Some(handle))
        }
        (None, Some(path)) => {
            let snapshot = SnapshotCatalog::from_path(path)?;
            (Catalog::Snapshot(Arc::new(snapshot)), None)
        }
        (None, None) => anyhow::bail!("No catalog configured"),
    };
    info!(catalog = catalog.name(), media_kind = %config.media_kind, "Catalog ready");

    let engine = DiscoveryEngine::new(catalog, DiscoveryPolicy::from(&config));
    let session = SwipeSession::new(ProfileStore::new(store), engine, config.empty_queue_policy);
    let api_host = api_host_of(&config.omdb_api_url)?;
    let cache_policy = CachePolicy::new(config.cache_name.clone(), api_host);

    let state = AppState::new(session, cache_policy)
        .await
        .context("Failed to restore profile")?;
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
