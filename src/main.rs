//! SaaSBoard Server
//!
//! Main entry point that wires all crates together and starts the server.

mod seed;

use tracing_subscriber::{EnvFilter, fmt};

use saasboard_api::{AppState, Stores};
use saasboard_core::config::AppConfig;
use saasboard_core::error::AppError;
use saasboard_database::{DatabasePool, MemoryStore, migration};

#[tokio::main]
async fn main() {
    let env = std::env::var("SAASBOARD_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        environment = %config.app.environment,
        "Starting {} v{}",
        config.app.name,
        env!("CARGO_PKG_VERSION")
    );

    let stores = if config.database.is_configured() {
        tracing::info!("Connecting to database...");
        let db = DatabasePool::connect(&config.database).await?;

        tracing::info!("Running database migrations...");
        migration::run_migrations(db.pool()).await?;
        tracing::info!("Database migrations complete");

        Stores::postgres(&db)
    } else {
        tracing::warn!("No database URL configured; using in-memory stores");
        let store = MemoryStore::new();
        seed::demo_accounts(&store)?;
        Stores::memory(store)
    };

    let state = AppState::new(config, stores);
    saasboard_api::serve(state).await?;

    tracing::info!("SaaSBoard server shut down gracefully");
    Ok(())
}
