mod cache;
mod config;
mod protocol;
mod research;
mod server;
mod source;
mod store;

use std::sync::Arc;

use anyhow::Result;
use config::DaemonConfig;
use research::ResearchRouter;
use server::ResearchServer;
use source::SourceRegistry;
use store::JsonFileStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = DaemonConfig::load()?;
    info!(
        socket = %config.server.socket_path.display(),
        data_path = %config.store.data_path.display(),
        cache_ttl_secs = config.cache.ttl_secs,
        cache_capacity = config.cache.capacity,
        inter_call_delay_ms = config.fetch.inter_call_delay_ms,
        fallback_enabled = config.research.enable_fallback,
        "loaded keyscout config"
    );

    let store = Arc::new(JsonFileStore::open(&config.store.data_path)?);
    info!(records = store.len(), "opened record store");

    let registry = SourceRegistry::new(&config.sources, &config.fetch)?;
    let router = ResearchRouter::new(
        registry,
        store,
        &config.fetch,
        &config.cache,
        &config.research,
    );
    let server = ResearchServer::new(config.server.clone(), router);
    server.run().await
}
