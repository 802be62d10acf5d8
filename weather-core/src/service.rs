//! Weather + air-quality aggregation.
//!
//! A lookup runs as a strict pipeline:
//! 1. resolve current conditions for the requested location,
//! 2. resolve air quality at the coordinates stage 1 returned (best effort),
//! 3. normalize both into a [`WeatherReport`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Number;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    aqi::AqiReading,
    cache::{CacheKey, ResponseCache},
    model::{
        Coordinates, CurrentConditions, Location, LocationQuery, Units, WeatherReport, Wind,
        round_half_up,
    },
    provider::{ProviderError, WeatherProvider},
};

/// Terminal failure of a lookup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    #[error("Location not found")]
    LocationNotFound,

    /// The weather call was answered with a non-success status.
    #[error("Weather provider returned HTTP {status}")]
    Upstream { status: u16 },

    #[error("Weather provider timed out")]
    Timeout,

    #[error("Unexpected failure: {0}")]
    Internal(String),
}

impl From<ProviderError> for LookupError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound => LookupError::LocationNotFound,
            ProviderError::Status(status) => LookupError::Upstream { status },
            ProviderError::Timeout => LookupError::Timeout,
            other => LookupError::Internal(other.to_string()),
        }
    }
}

/// Output of stage 1. `coordinates` are the provider's, not the caller's.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedWeather {
    pub conditions: CurrentConditions,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone)]
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
    cache: Option<Arc<ResponseCache>>,
}

impl WeatherService {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider, cache: None }
    }

    pub fn with_cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub async fn lookup(&self, query: &LocationQuery) -> Result<WeatherReport, LookupError> {
        let cache_key = match (&self.cache, &query.location) {
            (Some(_), Location::City(city)) => Some(CacheKey::new(city, query.units)),
            _ => None,
        };

        if let (Some(cache), Some(key)) = (&self.cache, &cache_key) {
            if let Some(report) = cache.get(key).await {
                return Ok(report);
            }
        }

        let resolved = self.resolve_weather(query).await?;
        let aqi = self.resolve_air_quality(resolved.coordinates).await;
        let report = normalize(resolved, aqi, query.units, Utc::now());

        info!(
            city = %report.city,
            country = report.country.as_deref().unwrap_or("-"),
            aqi = report.aqi,
            "Weather lookup completed"
        );

        if let (Some(cache), Some(key)) = (&self.cache, cache_key) {
            cache.insert(key, report.clone()).await;
        }

        Ok(report)
    }

    /// Stage 1: current conditions. Every failure here is terminal.
    pub async fn resolve_weather(&self, query: &LocationQuery) -> Result<ResolvedWeather, LookupError> {
        match &query.location {
            Location::City(city) => info!(%city, units = %query.units, "Fetching weather for city"),
            Location::Coordinates(c) => {
                info!(lat = c.lat, lon = c.lon, units = %query.units, "Fetching weather for coordinates")
            }
        }

        let conditions = self.provider.current_conditions(&query.location, query.units).await?;
        let coordinates = conditions.coordinates;

        Ok(ResolvedWeather { conditions, coordinates })
    }

    /// Stage 2: air quality. Never fails; falls back to index 1.
    pub async fn resolve_air_quality(&self, coordinates: Coordinates) -> AqiReading {
        match self.provider.air_quality(coordinates).await {
            Ok(air) => {
                let reading = AqiReading::from(air);
                info!(aqi = reading.index, label = reading.label, "AQI data received");
                reading
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch AQI data, using default");
                AqiReading::fallback()
            }
        }
    }
}

/// Stage 3: assemble the client document.
pub fn normalize(
    resolved: ResolvedWeather,
    aqi: AqiReading,
    units: Units,
    fetched_at: DateTime<Utc>,
) -> WeatherReport {
    let ResolvedWeather { conditions, coordinates } = resolved;
    let condition = conditions.condition.unwrap_or_default();
    let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());

    WeatherReport {
        city: conditions.name,
        country: conditions.country,
        units,
        temperature: round_half_up(conditions.temperature),
        feels_like: round_half_up(conditions.feels_like),
        humidity: conditions.humidity,
        aqi: aqi.index,
        aqi_label: aqi.label,
        condition: non_empty(condition.main).unwrap_or_else(|| "Unknown".to_string()),
        description: condition.description.unwrap_or_default(),
        icon: non_empty(condition.icon).unwrap_or_else(|| "01d".to_string()),
        lat: coordinates.lat,
        lon: coordinates.lon,
        wind: Wind {
            speed: conditions.wind_speed.unwrap_or_else(|| Number::from(0)),
            deg: conditions.wind_deg.unwrap_or_else(|| Number::from(0)),
        },
        pressure: conditions.pressure,
        visibility: conditions.visibility,
        fetched_at,
    }
}
