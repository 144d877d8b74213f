//! Task API Server binary.

use std::net::SocketAddr;

use task_server::{
    config::{Config, StoreBackend},
    create_app, create_state, init_tracing,
};
use task_store::{MemoryTaskStore, SqliteTaskStore, TaskStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    let addr: SocketAddr = config.server_addr().parse()?;

    match config.backend()? {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory document store");
            serve(addr, MemoryTaskStore::new()).await
        }
        StoreBackend::Sqlite(url) => {
            let store = match SqliteTaskStore::connect(&url).await {
                Ok(store) => store,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to connect to the database");
                    return Err(e.into());
                }
            };
            tracing::info!("Database synchronized");
            serve(addr, store).await
        }
    }
}

async fn serve<S: TaskStore + 'static>(addr: SocketAddr, store: S) -> anyhow::Result<()> {
    let app = create_app(create_state(store));

    tracing::info!(addr = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
