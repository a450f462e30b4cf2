//! Storefront server binary

use anyhow::Result;

use storefront::config::AppConfig;
use storefront::seed::seed_defaults;
use storefront::server::{AppState, serve};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    let state = build_state(&config).await?;

    seed_defaults(&state).await?;

    serve(&config, state).await
}

#[cfg(not(feature = "mongodb_backend"))]
async fn build_state(config: &AppConfig) -> Result<AppState> {
    tracing::info!("using in-memory storage backend");
    Ok(AppState::in_memory(config.lockout))
}

#[cfg(feature = "mongodb_backend")]
async fn build_state(config: &AppConfig) -> Result<AppState> {
    use std::sync::Arc;
    use storefront::entities::{Product, Purchase, User};
    use storefront::storage::MongoStore;

    let client = mongodb::Client::with_uri_str(&config.database.connection).await?;
    let db = client.database(&config.database.name);

    tracing::info!(
        database = %config.database.name,
        "connected to MongoDB"
    );

    Ok(AppState::new(
        Arc::new(MongoStore::<User>::new(db.clone())),
        Arc::new(MongoStore::<Product>::new(db.clone())),
        Arc::new(MongoStore::<Purchase>::new(db)),
        config.lockout,
    ))
}
