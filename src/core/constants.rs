//! Physical constants and unit conversions

/// Mean Earth radius used by the spherical distance models (meters)
pub const MEAN_EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meters to statute miles. Totals recorded by earlier builds were converted
/// with exactly this value, so it must not be refined.
pub const MILES_PER_METER: f64 = 0.000621371;

/// Meters per kilometer
pub const METERS_PER_KILOMETER: f64 = 1000.0;

/// Accepted range for a configured earth radius (meters)
pub const MIN_EARTH_RADIUS_M: f64 = 6_300_000.0;
pub const MAX_EARTH_RADIUS_M: f64 = 6_400_000.0;
