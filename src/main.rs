use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use ratiba::api;
use ratiba::config;
use ratiba::notify::TracingNotifier;
use ratiba::state::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let db_path = config::database_path();
    if let Some(parent) = db_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::error!("Cannot create data directory {}: {e}", parent.display());
            std::process::exit(1);
        }
    }

    let state = Arc::new(AppState::new(db_path, Arc::new(TracingNotifier)));

    // Fail fast on a broken database before accepting traffic.
    if let Err(e) = state.open_db() {
        tracing::error!("Database initialization failed: {e}");
        std::process::exit(1);
    }

    if let Err(e) = api::serve(state, config::bind_addr()).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
