//! Incremental distance accumulator
//!
//! Consumes an ordered stream of position fixes and keeps a running distance
//! total for one tracking session. The accumulator is a plain synchronous
//! state machine: it performs no I/O and is not internally synchronized.
//! Callers with several producers serialize fixes through a single consumer
//! (see [`crate::source::ChannelFixSource`]).

use crate::algorithms::distance::{DistanceStrategy, Haversine};
use crate::core::{DistanceUnit, PositionFix};
use crate::tracking::error::{TrackingError, TrackingResult};
use crate::tracking::listener::{FixListener, ListenerHandle, ListenerRegistry};
use crate::utils::config::TrackerConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Label used when a session is started without one
pub const DEFAULT_SESSION_LABEL: &str = "Unknown";

/// Emitted for every fix that contributed a distance delta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixEvent {
    pub fix: PositionFix,
    /// Distance from the previous accepted fix (meters)
    pub delta_distance_m: f64,
    /// Session total after applying the delta (meters)
    pub total_distance_m: f64,
    /// 1-based event counter within the session
    pub sequence: u64,
}

impl FixEvent {
    pub fn delta_in(&self, unit: DistanceUnit) -> f64 {
        unit.convert(self.delta_distance_m)
    }

    pub fn total_in(&self, unit: DistanceUnit) -> f64 {
        unit.convert(self.total_distance_m)
    }
}

/// What happened to a single ingested fix
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// Distance was accumulated and listeners were notified
    Processed(FixEvent),
    /// First fix of the session; stored as the baseline only
    Seeded,
    /// Dropped without touching state
    Ignored(TrackingError),
}

impl IngestOutcome {
    pub fn event(&self) -> Option<&FixEvent> {
        match self {
            IngestOutcome::Processed(event) => Some(event),
            _ => None,
        }
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, IngestOutcome::Ignored(_))
    }
}

/// Read-only snapshot of the accumulator state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingSession {
    pub is_active: bool,
    pub total_distance_m: f64,
    pub last_fix: Option<PositionFix>,
    pub label: String,
    pub fixes_accepted: u64,
    pub events_emitted: u64,
}

impl TrackingSession {
    pub fn total_in(&self, unit: DistanceUnit) -> f64 {
        unit.convert(self.total_distance_m)
    }
}

/// Running-total distance tracker for a single session
pub struct DistanceAccumulator {
    strategy: Box<dyn DistanceStrategy>,
    is_active: bool,
    total_distance_m: f64,
    last_fix: Option<PositionFix>,
    label: String,
    default_label: String,
    fixes_accepted: u64,
    events_emitted: u64,
    listeners: ListenerRegistry,
}

impl DistanceAccumulator {
    /// Create an inactive accumulator using the haversine model
    pub fn new() -> Self {
        Self::with_strategy(Box::new(Haversine::default()))
    }

    pub fn with_strategy(strategy: Box<dyn DistanceStrategy>) -> Self {
        Self {
            strategy,
            is_active: false,
            total_distance_m: 0.0,
            last_fix: None,
            label: DEFAULT_SESSION_LABEL.to_string(),
            default_label: DEFAULT_SESSION_LABEL.to_string(),
            fixes_accepted: 0,
            events_emitted: 0,
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn from_config(config: &TrackerConfig) -> Self {
        let mut accumulator = Self::with_strategy(config.distance_model.build(config.earth_radius_m));
        accumulator.default_label = config.default_label.clone();
        accumulator.label = config.default_label.clone();
        accumulator
    }

    /// Begin a session under the default label
    pub fn start(&mut self) {
        let label = self.default_label.clone();
        self.start_with_label(label);
    }

    /// Begin a session. A no-op while a session is already active, so a
    /// duplicate start cannot wipe a running total.
    pub fn start_with_label(&mut self, label: impl Into<String>) {
        if self.is_active {
            debug!(label = %self.label, "start ignored, session already active");
            return;
        }

        self.is_active = true;
        self.clear_progress();
        self.label = label.into();
        debug!(label = %self.label, model = self.strategy.name(), "tracking session started");
    }

    /// End the session. Total and last fix stay readable afterwards.
    pub fn stop(&mut self) {
        if !self.is_active {
            return;
        }

        self.is_active = false;
        debug!(
            label = %self.label,
            total_m = self.total_distance_m,
            events = self.events_emitted,
            "tracking session stopped"
        );
    }

    /// Clear the total and baseline regardless of whether a session is active
    pub fn reset(&mut self) {
        self.clear_progress();
        debug!(active = self.is_active, "tracking state reset");
    }

    fn clear_progress(&mut self) {
        self.total_distance_m = 0.0;
        self.last_fix = None;
        self.fixes_accepted = 0;
        self.events_emitted = 0;
    }

    /// Feed one fix into the session
    pub fn ingest(&mut self, fix: PositionFix) -> IngestOutcome {
        if let Err(rejection) = fix.validate() {
            warn!(%rejection, "dropping invalid fix");
            return IngestOutcome::Ignored(rejection.into());
        }

        if !self.is_active {
            debug!(timestamp_ms = fix.timestamp_ms(), "dropping fix delivered while inactive");
            return IngestOutcome::Ignored(TrackingError::InactiveSession);
        }

        let previous = match self.last_fix.take() {
            Some(previous) => previous,
            None => {
                trace!(timestamp_ms = fix.timestamp_ms(), "baseline fix stored");
                self.last_fix = Some(fix);
                self.fixes_accepted += 1;
                return IngestOutcome::Seeded;
            }
        };

        if fix.timestamp_ms() < previous.timestamp_ms() {
            warn!(
                previous_ms = previous.timestamp_ms(),
                current_ms = fix.timestamp_ms(),
                "fix timestamp went backwards"
            );
        }

        // f64::max discards NaN, so a misbehaving strategy cannot poison the total
        let delta = self.strategy.distance_m(&previous.coordinate(), &fix.coordinate()).max(0.0);
        self.total_distance_m += delta;
        self.fixes_accepted += 1;
        self.events_emitted += 1;
        self.last_fix = Some(fix.clone());

        trace!(delta_m = delta, total_m = self.total_distance_m, "distance accumulated");

        let event = FixEvent {
            fix,
            delta_distance_m: delta,
            total_distance_m: self.total_distance_m,
            sequence: self.events_emitted,
        };
        self.listeners.notify(&event);
        IngestOutcome::Processed(event)
    }

    /// Feed a fix that may be missing, as delivered by some providers
    pub fn ingest_optional(&mut self, fix: Option<PositionFix>) -> IngestOutcome {
        match fix {
            Some(fix) => self.ingest(fix),
            None => {
                warn!("dropping empty fix payload");
                IngestOutcome::Ignored(TrackingError::InvalidFix {
                    reason: "missing fix payload".to_string(),
                })
            }
        }
    }

    /// Feed a batch of fixes in delivery order
    pub fn ingest_batch<I>(&mut self, fixes: I) -> Vec<IngestOutcome>
    where
        I: IntoIterator<Item = PositionFix>,
    {
        fixes.into_iter().map(|fix| self.ingest(fix)).collect()
    }

    pub fn current_state(&self) -> TrackingSession {
        TrackingSession {
            is_active: self.is_active,
            total_distance_m: self.total_distance_m,
            last_fix: self.last_fix.clone(),
            label: self.label.clone(),
            fixes_accepted: self.fixes_accepted,
            events_emitted: self.events_emitted,
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn total_distance_m(&self) -> f64 {
        self.total_distance_m
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn subscribe(&mut self, listener: FixListener) -> ListenerHandle {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, handle: ListenerHandle) -> TrackingResult<()> {
        self.listeners.unsubscribe(handle)
    }

    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }
}

impl Default for DistanceAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
