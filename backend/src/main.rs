use tracing::info;
use tracing_subscriber::EnvFilter;

use piggymetrics_backend::config::ServerConfig;
use piggymetrics_backend::db::DbConnection;
use piggymetrics_backend::rest::{build_app, AppState};
use piggymetrics_backend::services::DocumentService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::load()?;

    info!("Setting up database at {}", config.database_url);
    let db = DbConnection::new(&config.database_url).await?;

    if config.min_save_interval.is_zero() {
        info!("Save throttling disabled");
    } else {
        info!("Accepting at most one save per {:?} per user", config.min_save_interval);
    }

    let state = AppState::new(DocumentService::new(db, config.min_save_interval));
    let app = build_app(state, &config)?;

    info!("Starting server on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
