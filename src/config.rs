use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub port: u16,
    pub api_key: String,
    pub openweather_base_url: String,
    pub openweather_weather_path: String,
    pub city_catalog_path: PathBuf,
    pub auth_token: Option<String>,
    pub cache_ttl: Duration,
    pub cache_sweep_interval: Duration,
    pub upstream_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 5000,
            api_key: String::new(),
            openweather_base_url: "https://api.openweathermap.org".to_string(),
            openweather_weather_path: "/data/2.5/weather".to_string(),
            city_catalog_path: PathBuf::from("data/cities.json"),
            auth_token: None,
            cache_ttl: Duration::from_secs(300),
            cache_sweep_interval: Duration::from_secs(320),
            upstream_timeout: Duration::from_secs(5),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup, falling back to
    /// defaults for anything unset. Blank values count as unset.
    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        Ok(Config {
            port: parse_or(var("PORT"), "PORT", defaults.port)?,
            api_key: var("API_KEY").unwrap_or(defaults.api_key),
            openweather_base_url: var("OPENWEATHER_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.openweather_base_url),
            openweather_weather_path: var("OPENWEATHER_WEATHER_PATH")
                .unwrap_or(defaults.openweather_weather_path),
            city_catalog_path: var("CITY_CATALOG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.city_catalog_path),
            auth_token: var("AUTH_TOKEN"),
            cache_ttl: secs_or(var("CACHE_TTL_SECS"), "CACHE_TTL_SECS", defaults.cache_ttl)?,
            cache_sweep_interval: secs_or(
                var("CACHE_SWEEP_SECS"),
                "CACHE_SWEEP_SECS",
                defaults.cache_sweep_interval,
            )?,
            upstream_timeout: secs_or(
                var("UPSTREAM_TIMEOUT_SECS"),
                "UPSTREAM_TIMEOUT_SECS",
                defaults.upstream_timeout,
            )?,
        })
    }
}

fn parse_or<T: FromStr>(value: Option<String>, key: &str, default: T) -> anyhow::Result<T> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} has an invalid value: {}", key, raw)),
        None => Ok(default),
    }
}

fn secs_or(value: Option<String>, key: &str, default: Duration) -> anyhow::Result<Duration> {
    let secs: u64 = parse_or(value, key, default.as_secs())?;
    if secs == 0 {
        return Err(anyhow::anyhow!("{} must be greater than zero", key));
    }
    Ok(Duration::from_secs(secs))
}
