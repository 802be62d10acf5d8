//! Air Quality Index labels (ordinal scale 1..=5).

use crate::model::AirQuality;

pub const FALLBACK_INDEX: i64 = 1;

/// Total over all integers; anything outside 1..=5 is "Unknown".
pub fn aqi_label(index: i64) -> &'static str {
    match index {
        1 => "Good",
        2 => "Fair",
        3 => "Moderate",
        4 => "Poor",
        5 => "Very Poor",
        _ => "Unknown",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AqiReading {
    pub index: i64,
    pub label: &'static str,
}

impl AqiReading {
    pub fn new(index: i64) -> Self {
        Self { index, label: aqi_label(index) }
    }

    /// Used whenever air quality could not be obtained.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_INDEX)
    }
}

impl From<AirQuality> for AqiReading {
    /// A missing or zero index counts as unavailable.
    fn from(air: AirQuality) -> Self {
        Self::new(air.index.filter(|i| *i != 0).unwrap_or(FALLBACK_INDEX))
    }
}
