pub mod admin;
pub mod api;
pub mod assistant;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod finance;
pub mod models;
pub mod state;
pub mod zodiac;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

/// Run the service: initialize tracing, migrate the database, and serve
/// the API until interrupted.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    std::fs::create_dir_all(config::app_data_dir())?;

    let state = Arc::new(state::AppState::new());
    // Open once up-front so migrations run before the first request
    state.open_db()?;

    let mut server = api::server::start_server(state, config::bind_addr()).await?;
    tracing::info!(addr = %server.addr, "{} listening", config::APP_NAME);

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    server.shutdown();

    Ok(())
}
