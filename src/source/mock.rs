//! In-memory fix source for tests and demos

use crate::core::PositionFix;
use crate::source::{FixSource, SourceError, SourceResult, SourceStatus};
use std::collections::VecDeque;

/// Queue-backed fix source with a simulated connection switch
pub struct MockFixSource {
    id: u8,
    status: SourceStatus,
    queue: VecDeque<PositionFix>,
    connected: bool,
}

impl MockFixSource {
    pub fn new(id: u8) -> Self {
        Self {
            id,
            status: SourceStatus::new(id),
            queue: VecDeque::new(),
            connected: true,
        }
    }

    /// Build a source preloaded with `fixes` in delivery order
    pub fn with_fixes<I>(id: u8, fixes: I) -> Self
    where
        I: IntoIterator<Item = PositionFix>,
    {
        let mut source = Self::new(id);
        source.queue.extend(fixes);
        source
    }

    pub fn push_fix(&mut self, fix: PositionFix) {
        self.queue.push_back(fix);
    }

    /// Queue a fix from raw coordinates
    pub fn push_position(&mut self, latitude: f64, longitude: f64, timestamp_ms: u64) {
        self.push_fix(PositionFix::new(latitude, longitude, timestamp_ms));
    }

    pub fn queued_fix_count(&self) -> usize {
        self.queue.len()
    }

    /// Simulate the provider going away
    pub fn disconnect(&mut self) {
        self.connected = false;
        self.status.connected = false;
    }

    pub fn reconnect(&mut self) {
        self.connected = true;
        self.status.connected = true;
    }
}

impl FixSource for MockFixSource {
    fn poll_fix(&mut self) -> SourceResult<Option<PositionFix>> {
        if !self.connected {
            return Err(SourceError::Disconnected { source_id: self.id });
        }

        let fix = self.queue.pop_front();
        if let Some(fix) = &fix {
            self.status.record(fix);
        }
        Ok(fix)
    }

    fn is_exhausted(&self) -> bool {
        self.queue.is_empty()
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn id(&self) -> u8 {
        self.id
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn status(&self) -> SourceStatus {
        self.status.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_source_creation() {
        let source = MockFixSource::new(3);
        assert_eq!(source.id(), 3);
        assert!(source.is_connected());
        assert!(source.is_exhausted());
        assert_eq!(source.queued_fix_count(), 0);
    }

    #[test]
    fn test_fix_queue() {
        let mut source = MockFixSource::new(1);
        source.push_position(45.0, -122.0, 1000);
        assert_eq!(source.queued_fix_count(), 1);

        let fix = source.poll_fix().unwrap().unwrap();
        assert_eq!(fix.latitude(), 45.0);
        assert_eq!(source.queued_fix_count(), 0);

        assert!(source.poll_fix().unwrap().is_none());

        let status = source.status();
        assert_eq!(status.fixes_delivered, 1);
        assert_eq!(status.last_fix_time_ms, Some(1000));
    }

    #[test]
    fn test_connection_simulation() {
        let mut source = MockFixSource::with_fixes(1, vec![PositionFix::new(0.0, 0.0, 0)]);

        source.disconnect();
        assert!(!source.is_connected());
        assert!(matches!(source.poll_fix(), Err(SourceError::Disconnected { source_id: 1 })));

        source.reconnect();
        assert!(source.poll_fix().unwrap().is_some());
    }
}
