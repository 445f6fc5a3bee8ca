//! Outbound payloads for tracking events
//!
//! Builds the data handed to display collaborators: the per-fix location
//! update forwarded to a UI layer and the one-line status shown in a
//! persistent notification. Nothing here renders or sends anything.

use crate::core::{DistanceUnit, MILES_PER_METER};
use crate::tracking::{FixEvent, TrackingSession};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Location update payload in the field layout UI bridges expect.
/// Unknown accuracy and speed are sent as 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdate {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
    pub speed: f64,
    pub timestamp: u64,
    /// Miles covered since the previous fix
    pub miles: f64,
    /// Session total in miles
    pub total_miles: f64,
}

impl From<&FixEvent> for LocationUpdate {
    fn from(event: &FixEvent) -> Self {
        Self {
            latitude: event.fix.latitude(),
            longitude: event.fix.longitude(),
            accuracy: event.fix.accuracy_m().unwrap_or(0.0),
            speed: event.fix.speed_mps().unwrap_or(0.0),
            timestamp: event.fix.timestamp_ms(),
            miles: event.delta_distance_m * MILES_PER_METER,
            total_miles: event.total_distance_m * MILES_PER_METER,
        }
    }
}

/// Title and body for a persistent tracking notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSummary {
    pub title: String,
    pub body: String,
}

impl StatusSummary {
    pub fn for_session(session: &TrackingSession, unit: DistanceUnit) -> Self {
        let title = if session.is_active {
            format!("Tracking Active - {}", session.label)
        } else {
            format!("Tracking Stopped - {}", session.label)
        };
        let body = format!(
            "{}: {:.2} | Tap to open",
            unit_heading(unit),
            session.total_in(unit)
        );
        Self { title, body }
    }
}

impl fmt::Display for StatusSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.title, self.body)
    }
}

fn unit_heading(unit: DistanceUnit) -> &'static str {
    match unit {
        DistanceUnit::Meters => "Meters",
        DistanceUnit::Kilometers => "Kilometers",
        DistanceUnit::Miles => "Miles",
    }
}

/// Output format for per-event reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format '{}', expected text or json", other)),
        }
    }
}

/// Render one event. JSON output is the [`LocationUpdate`] payload and is
/// always in miles; text output uses `unit`.
pub fn format_event(event: &FixEvent, format: ReportFormat, unit: DistanceUnit) -> serde_json::Result<String> {
    match format {
        ReportFormat::Json => serde_json::to_string(&LocationUpdate::from(event)),
        ReportFormat::Text => Ok(format!(
            "#{:<4} {:>11.6} {:>11.6}  +{:.3} {}  total {:.3} {}",
            event.sequence,
            event.fix.latitude(),
            event.fix.longitude(),
            event.delta_in(unit),
            unit,
            event.total_in(unit),
            unit
        )),
    }
}
