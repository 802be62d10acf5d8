use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Number;
use tracing::{debug, instrument, warn};

use crate::model::{AirQuality, Condition, Coordinates, CurrentConditions, Location, Units};

use super::{ProviderError, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Result<Self, ProviderError> {
        Self::with_settings(api_key, DEFAULT_BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Build a provider against a specific base URL (tests point this at a mock server).
    pub fn with_settings(
        api_key: String,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { api_key, base_url, http })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}/{}", self.base_url, path);

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            warn!(%status, body = %truncate_body(&body), "OpenWeather /{path} request failed");
            return Err(if status == StatusCode::NOT_FOUND {
                ProviderError::NotFound
            } else {
                ProviderError::Status(status.as_u16())
            });
        }

        serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: Number,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: Option<String>,
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: Option<Number>,
    deg: Option<Number>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    sys: Option<OwSys>,
    coord: OwCoord,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: Option<OwWind>,
    visibility: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OwAirMain {
    aqi: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwAirEntry {
    main: Option<OwAirMain>,
}

#[derive(Debug, Deserialize)]
struct OwAirResponse {
    #[serde(default)]
    list: Vec<OwAirEntry>,
}

impl From<OwCurrentResponse> for CurrentConditions {
    fn from(parsed: OwCurrentResponse) -> Self {
        let condition = parsed.weather.into_iter().next().map(|w| Condition {
            main: w.main,
            description: w.description,
            icon: w.icon,
        });
        let (wind_speed, wind_deg) = parsed.wind.map_or((None, None), |w| (w.speed, w.deg));

        CurrentConditions {
            name: parsed.name,
            country: parsed.sys.and_then(|s| s.country),
            coordinates: Coordinates { lat: parsed.coord.lat, lon: parsed.coord.lon },
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            humidity: parsed.main.humidity,
            pressure: parsed.main.pressure,
            visibility: parsed.visibility,
            wind_speed,
            wind_deg,
            condition,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self))]
    async fn current_conditions(
        &self,
        location: &Location,
        units: Units,
    ) -> Result<CurrentConditions, ProviderError> {
        let mut query = match location {
            Location::Coordinates(c) => {
                vec![("lat", c.lat.to_string()), ("lon", c.lon.to_string())]
            }
            Location::City(city) => vec![("q", city.clone())],
        };
        query.push(("units", units.as_str().to_string()));

        let parsed: OwCurrentResponse = self.get_json("weather", &query).await?;
        debug!(name = %parsed.name, "OpenWeather current conditions received");

        Ok(parsed.into())
    }

    #[instrument(skip(self))]
    async fn air_quality(&self, coordinates: Coordinates) -> Result<AirQuality, ProviderError> {
        let query = [("lat", coordinates.lat.to_string()), ("lon", coordinates.lon.to_string())];

        let parsed: OwAirResponse = self.get_json("air_pollution", &query).await?;
        let index = parsed.list.into_iter().next().and_then(|e| e.main).and_then(|m| m.aqi);

        Ok(AirQuality { index })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
