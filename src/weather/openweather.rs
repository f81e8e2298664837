use super::types::*;
use crate::config::Config;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpenWeatherError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[source] reqwest::Error),
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("JSON parsing failed: {0}")]
    JsonParsing(#[from] serde_json::Error),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

pub struct OpenWeatherClient {
    client: Client,
    weather_url: String,
    api_key: String,
    timeout: Duration,
}

impl OpenWeatherClient {
    pub fn new(config: &Config) -> Result<Self, OpenWeatherError> {
        let client = Client::builder()
            .user_agent("WeatherGateway/1.0")
            .timeout(config.upstream_timeout)
            .build()
            .map_err(OpenWeatherError::RequestFailed)?;

        Ok(Self {
            client,
            weather_url: format!(
                "{}{}",
                config.openweather_base_url, config.openweather_weather_path
            ),
            api_key: config.api_key.clone(),
            timeout: config.upstream_timeout,
        })
    }

    /// Fetches current conditions for one city id in metric units.
    /// A single attempt is made; any failure is returned to the caller.
    pub async fn fetch_current(&self, city_code: &str) -> Result<WeatherRecord, OpenWeatherError> {
        let response = self
            .make_request(&[
                ("id", city_code),
                ("units", "metric"),
                ("appid", &self.api_key),
            ])
            .await?;

        let current: CurrentWeatherResponse = serde_json::from_value(response)?;
        WeatherRecord::from_current(current, city_code)
    }

    async fn make_request(&self, params: &[(&str, &str)]) -> Result<Value, OpenWeatherError> {
        let response = self
            .client
            .get(&self.weather_url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(OpenWeatherError::ApiError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn classify(&self, error: reqwest::Error) -> OpenWeatherError {
        if error.is_timeout() {
            OpenWeatherError::Timeout(self.timeout)
        } else {
            OpenWeatherError::RequestFailed(error)
        }
    }
}

impl WeatherRecord {
    pub fn from_current(
        current: CurrentWeatherResponse,
        city_code: &str,
    ) -> Result<Self, OpenWeatherError> {
        let description = current
            .weather
            .into_iter()
            .next()
            .map(|condition| condition.description)
            .ok_or_else(|| {
                OpenWeatherError::MalformedResponse("empty weather array".to_string())
            })?;

        Ok(Self {
            city: current.name,
            temperature: current.main.temp,
            weather_description: description,
            city_code: city_code.to_string(),
            humidity: current.main.humidity,
            wind_speed_meters_per_second: current.wind.speed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, timeout: Duration) -> OpenWeatherClient {
        let config = Config {
            api_key: "test_key".to_string(),
            openweather_base_url: server.uri(),
            upstream_timeout: timeout,
            ..Config::default()
        };
        OpenWeatherClient::new(&config).unwrap()
    }

    fn london() -> serde_json::Value {
        serde_json::json!({
            "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
            "main": {"temp": 11.5, "humidity": 81},
            "wind": {"speed": 4.1, "deg": 240},
            "name": "London",
            "cod": 200
        })
    }

    #[tokio::test]
    async fn test_fetch_current_maps_fields() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("id", "2643743"))
            .and(query_param("units", "metric"))
            .and(query_param("appid", "test_key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, Duration::from_secs(5));
        let record = client.fetch_current("2643743").await.unwrap();

        assert_eq!(
            record,
            WeatherRecord {
                city: "London".to_string(),
                temperature: 11.5,
                weather_description: "light rain".to_string(),
                city_code: "2643743".to_string(),
                humidity: 81.0,
                wind_speed_meters_per_second: 4.1,
            }
        );
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, Duration::from_secs(5));
        let result = client.fetch_current("2643743").await;

        match result {
            Err(OpenWeatherError::ApiError(message)) => {
                assert!(message.contains("500"));
                assert!(message.contains("boom"));
            }
            other => panic!("expected ApiError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(london())
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, Duration::from_millis(200));
        let result = client.fetch_current("2643743").await;

        assert!(matches!(result, Err(OpenWeatherError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, Duration::from_secs(5));
        let result = client.fetch_current("2643743").await;

        assert!(matches!(result, Err(OpenWeatherError::JsonParsing(_))));
    }

    #[tokio::test]
    async fn test_missing_fields_fail_to_parse() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"name": "London"})),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, Duration::from_secs(5));
        let result = client.fetch_current("2643743").await;

        assert!(matches!(result, Err(OpenWeatherError::JsonParsing(_))));
    }

    #[tokio::test]
    async fn test_empty_weather_array_is_malformed() {
        let mock_server = MockServer::start().await;
        let mut body = london();
        body["weather"] = serde_json::json!([]);

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, Duration::from_secs(5));
        let result = client.fetch_current("2643743").await;

        assert!(matches!(result, Err(OpenWeatherError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_unreachable_upstream() {
        let config = Config {
            openweather_base_url: "http://127.0.0.1:1".to_string(),
            ..Config::default()
        };
        let client = OpenWeatherClient::new(&config).unwrap();
        let result = client.fetch_current("2643743").await;

        assert!(matches!(result, Err(OpenWeatherError::RequestFailed(_))));
    }
}
