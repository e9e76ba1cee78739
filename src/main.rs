// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use homedash::application::dashboard_service::DashboardService;
use homedash::application::key_value_store::KeyValueStore;
use homedash::infrastructure::config::{load_app_config, StorageBackend};
use homedash::infrastructure::file_store::FileStore;
use homedash::infrastructure::memory_store::MemoryStore;
use homedash::infrastructure::storage_gateway::StorageGateway;
use homedash::presentation::app_state::AppState;
use homedash::presentation::router;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let app_config = load_app_config()?;

    // Storage facility (infrastructure layer)
    let store: Arc<dyn KeyValueStore> = match app_config.storage.backend {
        StorageBackend::File => {
            tracing::info!(directory = %app_config.storage.directory.display(), "using file storage");
            Arc::new(FileStore::new(app_config.storage.directory.clone()))
        }
        StorageBackend::Memory => {
            tracing::info!("using in-memory storage");
            Arc::new(MemoryStore::new())
        }
    };

    // Dashboard service (application layer), hydrated from storage
    let dashboard_service = DashboardService::new(
        StorageGateway::new(store),
        app_config.news.default_source.clone(),
    );

    let state = Arc::new(AppState { dashboard_service });
    let app = router(state);

    let addr: SocketAddr = app_config.server.bind_addr.parse()?;
    tracing::info!("Starting homedash on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
