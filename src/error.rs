use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{catalog::CatalogError, weather::openweather::OpenWeatherError};

/// Errors surfaced by the HTTP handlers. The display text is the only thing a
/// client ever sees; causes stay in the server log.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid city code")]
    InvalidCityCode,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Unable to fetch weather data")]
    Upstream(#[source] OpenWeatherError),
    #[error("Unable to fetch weather data")]
    FetchTask(#[source] tokio::task::JoinError),
    #[error("Unable to fetch city codes")]
    Catalog(#[source] CatalogError),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidCityCode => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Upstream(_) | ApiError::FetchTask(_) | ApiError::Catalog(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Upstream(e) => tracing::error!(error = %e, "Weather fetch failed"),
            ApiError::FetchTask(e) => tracing::error!(error = %e, "Weather fetch task failed"),
            ApiError::Catalog(e) => tracing::error!(error = %e, "City catalog read failed"),
            _ => {}
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<OpenWeatherError> for ApiError {
    fn from(err: OpenWeatherError) -> Self {
        ApiError::Upstream(err)
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::Catalog(err)
    }
}
