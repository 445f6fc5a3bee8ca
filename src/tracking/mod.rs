//! Distance tracking sessions

pub mod accumulator;
pub mod driver;
pub mod error;
pub mod listener;

pub use accumulator::{
    DistanceAccumulator, FixEvent, IngestOutcome, TrackingSession, DEFAULT_SESSION_LABEL,
};
pub use driver::{PumpStats, TrackingDriver};
pub use error::{TrackingError, TrackingResult};
pub use listener::{FixListener, ListenerHandle, ListenerRegistry};
