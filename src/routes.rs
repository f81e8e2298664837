use axum::{
    extract::{Path, State},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    auth,
    catalog::CityCatalog,
    config::Config,
    error::ApiError,
    utils::validate_city_code,
    weather::{
        openweather::{OpenWeatherClient, OpenWeatherError},
        types::WeatherRecord,
        WeatherCache,
    },
};

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub weather_client: Arc<OpenWeatherClient>,
    pub weather_cache: WeatherCache,
    pub catalog: Arc<CityCatalog>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, OpenWeatherError> {
        let weather_client = Arc::new(OpenWeatherClient::new(&config)?);
        let weather_cache = WeatherCache::new(config.cache_ttl);
        let catalog = Arc::new(CityCatalog::new(config.city_catalog_path.clone()));

        Ok(Self {
            config: Arc::new(config),
            weather_client,
            weather_cache,
            catalog,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}

// Route handlers
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn get_city_codes(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let codes = state.catalog.list_city_codes().await?;
    Ok(Json(codes))
}

pub async fn get_weather(
    State(state): State<AppState>,
    city_code: Option<Path<String>>,
) -> Result<Json<WeatherRecord>, ApiError> {
    let city_code = city_code.map(|Path(code)| code).unwrap_or_default();
    if let Err(reason) = validate_city_code(&city_code) {
        tracing::debug!("{}", reason);
        return Err(ApiError::InvalidCityCode);
    }

    if let Some(cached) = state.weather_cache.get(&city_code).await {
        tracing::debug!(city_code = %city_code, "Serving from cache");
        return Ok(Json(cached));
    }

    // The fetch runs detached so a client hanging up mid-request does not
    // abort it; the result still lands in the cache.
    let fetch = tokio::spawn(fetch_and_cache(state, city_code));
    let record = fetch.await.map_err(ApiError::FetchTask)??;
    Ok(Json(record))
}

async fn fetch_and_cache(
    state: AppState,
    city_code: String,
) -> Result<WeatherRecord, OpenWeatherError> {
    tracing::debug!(city_code = %city_code, "Cache miss, fetching from OpenWeather");
    let record = state.weather_client.fetch_current(&city_code).await?;
    state.weather_cache.set(city_code, record.clone()).await;
    Ok(record)
}

// Create the router
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/weather/cities", get(get_city_codes))
        .route("/api/weather/", get(get_weather))
        .route("/api/weather/:city_code", get(get_weather))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .with_state(state)
}
