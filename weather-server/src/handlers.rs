//! Request handlers

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};
use weather_core::{LocationQuery, WeatherReport};

use crate::{error::ApiError, state::AppState};

/// Raw query string. Validation happens in [`LocationQuery::from_params`].
#[derive(Debug, Default, PartialEq, Deserialize)]
pub struct WeatherParams {
    pub city: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub units: Option<String>,
}

impl WeatherParams {
    /// Collect known keys from decoded pairs. A repeated key keeps its first value.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "city" => &mut params.city,
                "lat" => &mut params.lat,
                "lon" => &mut params.lon,
                "units" => &mut params.units,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

/// GET /weather
#[instrument(skip(state))]
pub async fn get_weather(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<WeatherReport>, ApiError> {
    let Query(pairs) = query.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected query string");
        ApiError::BadRequest("Invalid query string".into())
    })?;
    let params = WeatherParams::from_pairs(pairs);

    let query = LocationQuery::from_params(
        params.city.as_deref(),
        params.lat.as_deref(),
        params.lon.as_deref(),
        params.units.as_deref(),
    )?;

    let service = state.weather.as_ref().ok_or(ApiError::ServiceUnavailable)?;
    let report = service.lookup(&query).await?;

    Ok(Json(report))
}

/// OPTIONS without CORS preflight headers; preflights are answered by the CORS layer.
pub async fn options() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub configured: bool,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        configured: state.weather.is_some(),
    })
}
