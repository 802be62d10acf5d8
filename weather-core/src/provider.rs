use crate::model::{AirQuality, Coordinates, CurrentConditions, Location, Units};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Failure of a single upstream call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// The provider could not resolve the requested location.
    #[error("Location not found by provider")]
    NotFound,

    /// The provider answered with a non-success status other than 404.
    #[error("Provider returned HTTP {0}")]
    Status(u16),

    #[error("Provider request timed out")]
    Timeout,

    #[error("Failed to reach provider: {0}")]
    Transport(String),

    #[error("Failed to decode provider response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_decode() {
            ProviderError::Decode(err.to_string())
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}

/// Upstream weather source.
///
/// The two calls are separate stages so each can be replaced in isolation:
/// `air_quality` is always fed the coordinates `current_conditions` resolved.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_conditions(
        &self,
        location: &Location,
        units: Units,
    ) -> Result<CurrentConditions, ProviderError>;

    async fn air_quality(&self, coordinates: Coordinates) -> Result<AirQuality, ProviderError>;
}
