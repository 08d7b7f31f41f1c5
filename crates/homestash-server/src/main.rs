//! Homestash Server Binary
//!
//! Opens the inventory database and serves the REST API.

use std::sync::Arc;

use homestash_core::{ServerConfig, SqliteInventoryStore};
use homestash_server::{serve, AppState};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "homestash_core=info,homestash_server=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let store = SqliteInventoryStore::open(&config.database_path)?;
    let addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(Arc::new(store), config));

    serve(&addr, state).await
}
