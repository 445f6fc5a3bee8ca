//! Single-consumer channel source
//!
//! Any number of producer threads hold a [`FixSender`]. The thread that owns
//! the accumulator drains the matching [`ChannelFixSource`], so fixes are
//! applied one at a time in arrival order no matter how many producers exist.

use crate::core::PositionFix;
use crate::source::{FixSource, SourceError, SourceResult, SourceStatus};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;
use tracing::debug;

/// Producer half of a fix channel
#[derive(Debug, Clone)]
pub struct FixSender {
    source_id: u8,
    sender: Sender<PositionFix>,
}

impl FixSender {
    /// Queue a fix for the consumer. Fails once the consumer is dropped.
    pub fn send(&self, fix: PositionFix) -> SourceResult<()> {
        self.sender
            .send(fix)
            .map_err(|_| SourceError::Disconnected { source_id: self.source_id })
    }
}

/// Consumer half of a fix channel
pub struct ChannelFixSource {
    id: u8,
    receiver: Receiver<PositionFix>,
    status: SourceStatus,
    disconnected: bool,
}

impl ChannelFixSource {
    /// Create a channel source and its first producer handle
    pub fn new(id: u8) -> (Self, FixSender) {
        let (sender, receiver) = mpsc::channel();
        let source = Self {
            id,
            receiver,
            status: SourceStatus::new(id),
            disconnected: false,
        };
        (source, FixSender { source_id: id, sender })
    }

    fn mark_disconnected(&mut self) -> SourceError {
        if !self.disconnected {
            debug!(source_id = self.id, "all fix producers dropped");
        }
        self.disconnected = true;
        self.status.connected = false;
        SourceError::Disconnected { source_id: self.id }
    }

    fn deliver(&mut self, fix: PositionFix) -> Option<PositionFix> {
        self.status.record(&fix);
        Some(fix)
    }
}

impl FixSource for ChannelFixSource {
    fn poll_fix(&mut self) -> SourceResult<Option<PositionFix>> {
        match self.receiver.try_recv() {
            Ok(fix) => Ok(self.deliver(fix)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(self.mark_disconnected()),
        }
    }

    fn poll_fix_timeout(&mut self, timeout: Duration) -> SourceResult<Option<PositionFix>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(fix) => Ok(self.deliver(fix)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(self.mark_disconnected()),
        }
    }

    fn is_exhausted(&self) -> bool {
        self.disconnected
    }

    fn is_connected(&self) -> bool {
        !self.disconnected
    }

    fn id(&self) -> u8 {
        self.id
    }

    fn name(&self) -> &str {
        "channel"
    }

    fn status(&self) -> SourceStatus {
        self.status.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_send_and_poll() {
        let (mut source, sender) = ChannelFixSource::new(2);
        assert!(source.poll_fix().unwrap().is_none());

        sender.send(PositionFix::new(1.0, 2.0, 10)).unwrap();
        let fix = source.poll_fix().unwrap().unwrap();
        assert_eq!(fix.timestamp_ms(), 10);
        assert_eq!(source.status().fixes_delivered, 1);
    }

    #[test]
    fn test_disconnect_after_drain() {
        let (mut source, sender) = ChannelFixSource::new(2);
        sender.send(PositionFix::new(1.0, 2.0, 10)).unwrap();
        drop(sender);

        // Queued fixes are still delivered after producers leave
        assert!(source.poll_fix().unwrap().is_some());
        assert_eq!(source.poll_fix(), Err(SourceError::Disconnected { source_id: 2 }));
        assert!(source.is_exhausted());
        assert!(!source.is_connected());
    }

    #[test]
    fn test_send_fails_without_consumer() {
        let (source, sender) = ChannelFixSource::new(4);
        drop(source);
        assert_eq!(
            sender.send(PositionFix::new(0.0, 0.0, 0)),
            Err(SourceError::Disconnected { source_id: 4 })
        );
    }

    #[test]
    fn test_multiple_producers_are_serialized() {
        let (mut source, sender) = ChannelFixSource::new(1);
        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let sender = sender.clone();
                thread::spawn(move || {
                    for i in 0..25u64 {
                        sender.send(PositionFix::new(0.0, 0.0, worker * 100 + i)).unwrap();
                    }
                })
            })
            .collect();
        drop(sender);
        for handle in handles {
            handle.join().unwrap();
        }

        let mut received = 0;
        while let Ok(Some(_)) = source.poll_fix_timeout(Duration::from_millis(50)) {
            received += 1;
        }
        assert_eq!(received, 100);
    }
}
