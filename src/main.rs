use std::sync::Arc;

use taskflow_api::config;
use taskflow_api::routes::app;
use taskflow_api::state::AppState;
use taskflow_api::store::{MemoryStore, PgStore, RecordStore};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting Taskflow API in {:?} mode", config.environment);

    let store: Arc<dyn RecordStore> = match std::env::var("DATABASE_URL") {
        Ok(url) => match PgStore::connect(&url).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::error!("failed to connect to database: {}", e);
                std::process::exit(1);
            }
        },
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using in-memory record store");
            Arc::new(MemoryStore::new())
        }
    };

    let app = app(AppState::new(store));

    // Allow deployments to override port via env
    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Taskflow API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
