pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod messages;
pub mod model;
pub mod seed;
pub mod store;

pub use api::routes;
pub use error::{ApiError, ValidationError};
pub use model::*;
pub use store::{MemoryStore, PostgresStore, Store};

use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Full application router with its state attached.
pub fn build_app<S: Store + 'static>(store: Arc<S>) -> axum::Router {
    api::routes::create_router::<S>()
        .layer(CorsLayer::permissive())
        .with_state(store)
}

/// Load configuration, open the configured store and serve until shutdown.
pub async fn run_server() -> anyhow::Result<()> {
    use crate::config::{AppConfig, StoreBackend};

    dotenvy::dotenv().ok();

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let config = AppConfig::load()?;
    log::info!(
        "Configuration loaded: server={} backend={:?}",
        config.server_address(),
        config.database.backend
    );

    match config.database.backend {
        StoreBackend::Postgres => {
            let database_url = config.database_url()?;
            let max_connections = config.database.max_connections.unwrap_or(20);
            let postgres_store = PostgresStore::new(&database_url, max_connections).await?;
            postgres_store.migrate().await?;
            serve_store(Arc::new(postgres_store), &config).await
        }
        StoreBackend::Memory => serve_store(Arc::new(MemoryStore::new()), &config).await,
    }
}

async fn serve_store<S: Store + 'static>(
    store: Arc<S>,
    config: &crate::config::AppConfig,
) -> anyhow::Result<()> {
    if std::env::var("LOAD_SEED_DATA").unwrap_or_default() == "true" {
        log::info!("Loading seed data...");
        seed::load_seed_data(&*store).await?;
    }

    let bind_address = config.server_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    log::info!("City registry listening on http://{}", bind_address);

    axum::serve(listener, build_app(store)).await?;

    Ok(())
}
