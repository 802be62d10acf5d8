use std::{fmt, str::FromStr};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Number;
use thiserror::Error;

/// Rejection of a caller-supplied location query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("City or coordinates (lat/lon) are required")]
    MissingLocation,

    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    #[error("Invalid units '{0}'. Supported units: metric, imperial")]
    InvalidUnits(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = QueryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "" | "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(QueryError::InvalidUnits(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Build coordinates, rejecting non-finite or out-of-range values.
    pub fn new(lat: f64, lon: f64) -> Result<Self, QueryError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(QueryError::InvalidCoordinates);
        }
        Ok(Self { lat, lon })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    City(String),
    Coordinates(Coordinates),
}

/// A validated lookup request: one location form plus the unit system.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationQuery {
    pub location: Location,
    pub units: Units,
}

impl LocationQuery {
    pub fn city(name: impl Into<String>, units: Units) -> Self {
        Self { location: Location::City(name.into()), units }
    }

    pub fn coordinates(coordinates: Coordinates, units: Units) -> Self {
        Self { location: Location::Coordinates(coordinates), units }
    }

    /// Validate raw query-string values.
    ///
    /// Empty values count as absent. A complete `lat`+`lon` pair takes
    /// precedence over `city`.
    pub fn from_params(
        city: Option<&str>,
        lat: Option<&str>,
        lon: Option<&str>,
        units: Option<&str>,
    ) -> Result<Self, QueryError> {
        fn present(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|s| !s.is_empty())
        }

        let units = match present(units) {
            Some(raw) => raw.parse()?,
            None => Units::default(),
        };

        if let (Some(lat), Some(lon)) = (present(lat), present(lon)) {
            let lat: f64 = lat.parse().map_err(|_| QueryError::InvalidCoordinates)?;
            let lon: f64 = lon.parse().map_err(|_| QueryError::InvalidCoordinates)?;
            return Ok(Self::coordinates(Coordinates::new(lat, lon)?, units));
        }

        match present(city) {
            Some(city) => Ok(Self::city(city, units)),
            None => Err(QueryError::MissingLocation),
        }
    }
}

/// Current conditions as decoded from the upstream provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub name: String,
    pub country: Option<String>,
    pub coordinates: Coordinates,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: Number,
    pub visibility: Option<u32>,
    pub wind_speed: Option<Number>,
    pub wind_deg: Option<Number>,
    pub condition: Option<Condition>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Condition {
    pub main: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

/// Air-quality reading as decoded from the upstream provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirQuality {
    /// Raw index of the first entry, if the provider returned one.
    pub index: Option<i64>,
}

/// Wind values are passed through as the provider sent them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: Number,
    pub deg: Number,
}

/// The normalized document returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub units: Units,
    pub temperature: i64,
    pub feels_like: i64,
    pub humidity: u8,
    pub aqi: i64,
    pub aqi_label: &'static str,
    pub condition: String,
    pub description: String,
    pub icon: String,
    pub lat: f64,
    pub lon: f64,
    pub wind: Wind,
    pub pressure: Number,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<u32>,
    #[serde(serialize_with = "serialize_iso_millis")]
    pub fetched_at: DateTime<Utc>,
}

/// Round half up, so `-2.5` becomes `-2` and `21.5` becomes `22`.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

fn serialize_iso_millis<S: Serializer>(at: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}
