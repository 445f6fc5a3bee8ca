//! Core data types for mileage tracking

use crate::core::constants::{METERS_PER_KILOMETER, MILES_PER_METER};
use crate::core::error::FixRejection;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Check that both components are finite and inside their geodetic ranges
    pub fn is_valid(&self) -> bool {
        self.has_valid_latitude() && self.has_valid_longitude()
    }

    fn has_valid_latitude(&self) -> bool {
        self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude)
    }

    fn has_valid_longitude(&self) -> bool {
        self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Providers report an unknown speed as a negative value
fn normalize_speed(speed_mps: f64) -> Option<f64> {
    if speed_mps.is_finite() && speed_mps >= 0.0 {
        Some(speed_mps)
    } else {
        None
    }
}

fn deserialize_speed<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.and_then(normalize_speed))
}

/// A single position observation delivered by a location provider.
///
/// Fixes are immutable once built; the `with_*` methods consume the fix and
/// return a new one. Unknown accuracy or speed is `None`. A negative speed is
/// how providers report "unknown" and reads back as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    latitude: f64,
    longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    accuracy: Option<f64>,
    #[serde(
        default,
        deserialize_with = "deserialize_speed",
        skip_serializing_if = "Option::is_none"
    )]
    speed: Option<f64>,
    #[serde(rename = "timestamp")]
    timestamp_ms: u64,
}

impl PositionFix {
    /// Create a fix with unknown accuracy and speed
    pub fn new(latitude: f64, longitude: f64, timestamp_ms: u64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
            speed: None,
            timestamp_ms,
        }
    }

    pub fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy = Some(accuracy_m);
        self
    }

    pub fn with_speed(mut self, speed_mps: f64) -> Self {
        self.speed = normalize_speed(speed_mps);
        self
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Horizontal accuracy radius in meters, if the provider reported one
    pub fn accuracy_m(&self) -> Option<f64> {
        self.accuracy
    }

    /// Ground speed in m/s, if the provider reported one
    pub fn speed_mps(&self) -> Option<f64> {
        self.speed
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    /// Reject fixes that cannot describe a point on the earth
    pub fn validate(&self) -> Result<(), FixRejection> {
        let coordinate = self.coordinate();
        if !coordinate.is_valid() {
            return Err(if coordinate.has_valid_latitude() {
                FixRejection::Longitude(self.longitude)
            } else {
                FixRejection::Latitude(self.latitude)
            });
        }
        if let Some(accuracy) = self.accuracy {
            if !accuracy.is_finite() || accuracy < 0.0 {
                return Err(FixRejection::Accuracy(accuracy));
            }
        }
        Ok(())
    }
}

/// Display unit for distances. Internal bookkeeping is always meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    Meters,
    Kilometers,
    #[default]
    Miles,
}

impl DistanceUnit {
    pub fn convert(&self, meters: f64) -> f64 {
        match self {
            DistanceUnit::Meters => meters,
            DistanceUnit::Kilometers => meters / METERS_PER_KILOMETER,
            DistanceUnit::Miles => meters * MILES_PER_METER,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DistanceUnit::Meters => "m",
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Miles => "mi",
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
