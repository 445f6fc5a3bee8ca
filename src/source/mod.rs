//! Fix sources
//!
//! Producers of position fixes sit behind [`FixSource`] so the accumulator can
//! be driven by a live provider, a channel fed from other threads, or a
//! recorded log, all through the same sequential pull loop.

pub mod channel;
pub mod error;
pub mod mock;
pub mod replay;

pub use channel::{ChannelFixSource, FixSender};
pub use error::{SourceError, SourceResult};
pub use mock::MockFixSource;
pub use replay::ReplaySource;

use crate::core::PositionFix;
use std::time::Duration;

/// Pull interface for position fix producers
pub trait FixSource {
    /// Return the next fix if one is available without waiting.
    /// `Ok(None)` means nothing is queued right now.
    fn poll_fix(&mut self) -> SourceResult<Option<PositionFix>>;

    /// Like [`poll_fix`](Self::poll_fix) but may wait up to `timeout` for a
    /// fix. Sources that never block just poll.
    fn poll_fix_timeout(&mut self, _timeout: Duration) -> SourceResult<Option<PositionFix>> {
        self.poll_fix()
    }

    /// True once the source can never produce another fix
    fn is_exhausted(&self) -> bool;

    fn is_connected(&self) -> bool;

    fn id(&self) -> u8;

    fn name(&self) -> &str;

    fn status(&self) -> SourceStatus;
}

/// Delivery counters for a fix source
#[derive(Debug, Clone, PartialEq)]
pub struct SourceStatus {
    pub id: u8,
    pub connected: bool,
    pub fixes_delivered: u64,
    pub last_fix_time_ms: Option<u64>,
}

impl SourceStatus {
    pub fn new(id: u8) -> Self {
        Self {
            id,
            connected: true,
            fixes_delivered: 0,
            last_fix_time_ms: None,
        }
    }

    pub(crate) fn record(&mut self, fix: &PositionFix) {
        self.fixes_delivered += 1;
        self.last_fix_time_ms = Some(fix.timestamp_ms());
    }
}
