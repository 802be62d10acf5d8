//! Application state shared across handlers

use std::sync::Arc;

use weather_core::WeatherService;

#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// `None` when the provider credential is not configured.
    pub weather: Option<Arc<WeatherService>>,
}

impl AppState {
    pub fn new(weather: Option<WeatherService>) -> Self {
        Self { weather: weather.map(Arc::new) }
    }
}
