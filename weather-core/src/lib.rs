//! Core library for the weather aggregation endpoint.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstraction over the upstream weather provider
//! - The weather + air-quality lookup pipeline
//! - Shared domain models (queries, normalized reports)
//!
//! It is used by `weather-server`, but can also be reused by other binaries or services.

pub mod aqi;
pub mod cache;
pub mod config;
pub mod model;
pub mod provider;
pub mod service;

pub use aqi::{AqiReading, aqi_label};
pub use cache::ResponseCache;
pub use config::Config;
pub use model::{Coordinates, Location, LocationQuery, QueryError, Units, WeatherReport};
pub use provider::{OpenWeatherProvider, ProviderError, WeatherProvider};
pub use service::{LookupError, WeatherService};
