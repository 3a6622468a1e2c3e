use anyhow::Context;
use tracing_subscriber::EnvFilter;

use petbook::config::{self, StorageBackend};
use petbook::database::{schema, DatabaseManager};
use petbook::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, APP_ENV, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("petbook=info,tower_http=info")),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config().clone();
    tracing::info!("Starting petbook in {:?} mode", config.environment);

    let state = match config.database.backend {
        StorageBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to Postgres")?;
            schema::migrate(&pool).await.context("failed to apply schema")?;
            AppState::postgres(pool, config.clone())
        }
        StorageBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on restart");
            AppState::memory(config.clone())
        }
    };

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("petbook listening on http://{}", bind_addr);

    axum::serve(listener, petbook::app(state)).await.context("server error")?;
    Ok(())
}
