//! Mileage Tracker
//!
//! Turns an intermittent stream of noisy position fixes into a running
//! distance total, emitting a per-fix event with the delta and the new total.

pub mod core;
pub mod algorithms;
pub mod tracking;
pub mod source;
pub mod report;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{Coordinate, DistanceUnit, PositionFix, MEAN_EARTH_RADIUS_M, MILES_PER_METER};
pub use crate::algorithms::{DistanceModel, DistanceStrategy, Equirectangular, Haversine, SphericalVector};
pub use crate::tracking::{
    DistanceAccumulator, FixEvent, IngestOutcome, ListenerHandle, PumpStats, TrackingDriver,
    TrackingError, TrackingResult, TrackingSession,
};
pub use crate::source::{
    ChannelFixSource, FixSender, FixSource, MockFixSource, ReplaySource, SourceError, SourceResult,
};
pub use crate::report::{format_event, LocationUpdate, ReportFormat, StatusSummary};
pub use crate::utils::{ConfigError, ConfigurationManager, TrackerConfig};
