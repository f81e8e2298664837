use serde::{Deserialize, Serialize};

/// Normalized current conditions for one city, as served to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    pub city: String,
    pub temperature: f64,
    pub weather_description: String,
    pub city_code: String,
    pub humidity: f64,
    pub wind_speed_meters_per_second: f64,
}

// OpenWeather /data/2.5/weather response, limited to the fields we map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeatherResponse {
    pub name: String,
    pub main: CurrentWeatherMain,
    pub weather: Vec<CurrentWeatherCondition>,
    pub wind: CurrentWeatherWind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeatherMain {
    pub temp: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeatherCondition {
    pub id: Option<i32>,
    pub main: Option<String>,
    pub description: String,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeatherWind {
    pub speed: f64,
    pub deg: Option<f64>,
    pub gust: Option<f64>,
}
