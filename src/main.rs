use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod auth;
mod catalog;
mod config;
mod error;
mod routes;
mod utils;
mod weather;

use config::Config;
use routes::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_gateway_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    if config.api_key.is_empty() {
        tracing::warn!("API_KEY not set, upstream weather requests will be rejected");
    }
    if config.auth_token.is_some() {
        tracing::info!("Bearer token required on /api routes");
    }

    let port = config.port;
    let sweep_interval = config.cache_sweep_interval;

    let state = AppState::new(config)?;
    tracing::info!(
        catalog = %state.catalog.path().display(),
        ttl_secs = state.weather_cache.ttl().as_secs(),
        "Weather gateway configured"
    );

    if !state.catalog.is_present() {
        tracing::warn!(
            catalog = %state.catalog.path().display(),
            cwd = %std::env::current_dir().map(|d| d.display().to_string()).unwrap_or_default(),
            "City catalog not found; set CITY_CATALOG_PATH or start the server from the crate root"
        );
    }

    // Purges expired cache entries for the lifetime of the process
    let _sweeper = state.weather_cache.spawn_sweeper(sweep_interval);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server running on port {}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
