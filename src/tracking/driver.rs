//! Pull loop connecting a fix source to an accumulator

use crate::source::{FixSource, SourceResult};
use crate::tracking::accumulator::{DistanceAccumulator, IngestOutcome};
use std::time::Duration;
use tracing::{debug, info};

/// Counters for one pump or run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpStats {
    pub polled: u64,
    pub processed: u64,
    pub seeded: u64,
    pub ignored: u64,
}

impl PumpStats {
    fn record(&mut self, outcome: &IngestOutcome) {
        self.polled += 1;
        match outcome {
            IngestOutcome::Processed(_) => self.processed += 1,
            IngestOutcome::Seeded => self.seeded += 1,
            IngestOutcome::Ignored(_) => self.ignored += 1,
        }
    }
}

/// Owns the accumulator for a session and feeds it from a [`FixSource`].
///
/// The driver is the single consumer: whatever produces fixes, they reach the
/// accumulator one at a time from this loop.
pub struct TrackingDriver {
    accumulator: DistanceAccumulator,
    idle_timeout: Duration,
}

impl TrackingDriver {
    pub fn new(accumulator: DistanceAccumulator) -> Self {
        Self {
            accumulator,
            idle_timeout: Duration::from_millis(250),
        }
    }

    /// How long [`run_to_end`](Self::run_to_end) waits per poll on blocking sources
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn accumulator(&self) -> &DistanceAccumulator {
        &self.accumulator
    }

    pub fn accumulator_mut(&mut self) -> &mut DistanceAccumulator {
        &mut self.accumulator
    }

    pub fn into_accumulator(self) -> DistanceAccumulator {
        self.accumulator
    }

    /// Ingest everything the source has ready right now
    pub fn pump(&mut self, source: &mut dyn FixSource) -> SourceResult<PumpStats> {
        let mut stats = PumpStats::default();
        while let Some(fix) = source.poll_fix()? {
            let outcome = self.accumulator.ingest(fix);
            stats.record(&outcome);
        }
        Ok(stats)
    }

    /// Keep ingesting until the source is exhausted or disconnects
    pub fn run_to_end(&mut self, source: &mut dyn FixSource) -> SourceResult<PumpStats> {
        let mut stats = PumpStats::default();
        debug!(source = source.name(), source_id = source.id(), "draining fix source");

        loop {
            match source.poll_fix_timeout(self.idle_timeout) {
                Ok(Some(fix)) => {
                    let outcome = self.accumulator.ingest(fix);
                    stats.record(&outcome);
                }
                Ok(None) if source.is_exhausted() => break,
                Ok(None) => continue,
                Err(e) if e.is_end_of_stream() => break,
                Err(e) => return Err(e),
            }
        }

        info!(
            source = source.name(),
            polled = stats.polled,
            processed = stats.processed,
            ignored = stats.ignored,
            total_m = self.accumulator.total_distance_m(),
            "fix source drained"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PositionFix;
    use crate::source::{ChannelFixSource, MockFixSource, SourceError};
    use std::thread;

    fn equator_walk(count: u64) -> Vec<PositionFix> {
        (0..count)
            .map(|i| PositionFix::new(0.0, i as f64 * 0.001, i * 15_000))
            .collect()
    }

    #[test]
    fn test_pump_drains_available_fixes() {
        let mut driver = TrackingDriver::new(DistanceAccumulator::new());
        driver.accumulator_mut().start();

        let mut source = MockFixSource::with_fixes(1, equator_walk(5));
        let stats = driver.pump(&mut source).unwrap();

        assert_eq!(stats, PumpStats { polled: 5, processed: 4, seeded: 1, ignored: 0 });
        let expected = 4.0 * 111.19493;
        assert!((driver.accumulator().total_distance_m() - expected).abs() < 0.1);
    }

    #[test]
    fn test_pump_counts_inactive_drops() {
        let mut driver = TrackingDriver::new(DistanceAccumulator::new());
        let mut source = MockFixSource::with_fixes(1, equator_walk(3));

        let stats = driver.pump(&mut source).unwrap();
        assert_eq!(stats.ignored, 3);
        assert_eq!(driver.accumulator().total_distance_m(), 0.0);
    }

    #[test]
    fn test_pump_propagates_disconnect() {
        let mut driver = TrackingDriver::new(DistanceAccumulator::new());
        let mut source = MockFixSource::new(9);
        source.disconnect();
        assert_eq!(driver.pump(&mut source), Err(SourceError::Disconnected { source_id: 9 }));
    }

    #[test]
    fn test_run_to_end_with_channel_producers() {
        let mut driver = TrackingDriver::new(DistanceAccumulator::new())
            .with_idle_timeout(Duration::from_millis(20));
        driver.accumulator_mut().start();

        let (mut source, sender) = ChannelFixSource::new(1);
        let producer = thread::spawn(move || {
            for fix in equator_walk(10) {
                sender.send(fix).unwrap();
            }
        });

        let stats = driver.run_to_end(&mut source).unwrap();
        producer.join().unwrap();

        assert_eq!(stats.polled, 10);
        assert_eq!(stats.processed, 9);
        let state = driver.into_accumulator().current_state();
        assert_eq!(state.events_emitted, 9);
        assert_eq!(state.last_fix.map(|f| f.timestamp_ms()), Some(9 * 15_000));
    }
}
