//! Forward events to another thread.

use crate::core::controller::DetectionEvent;
use crate::report::Reporter;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use tracing::warn;

/// Sends a copy of every event over a bounded channel.
///
/// The detection loop never blocks on a slow consumer: when the channel is
/// full the event is dropped and a warning logged.
pub struct ChannelReporter {
    sender: Sender<DetectionEvent>,
    dropped: u64,
}

impl ChannelReporter {
    /// Create a reporter and the receiving end of its channel.
    pub fn new(capacity: usize) -> (Self, Receiver<DetectionEvent>) {
        let (sender, receiver) = bounded(capacity);
        (Self { sender, dropped: 0 }, receiver)
    }

    pub fn from_sender(sender: Sender<DetectionEvent>) -> Self {
        Self { sender, dropped: 0 }
    }

    /// Events that could not be delivered.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl Reporter for ChannelReporter {
    fn report(&mut self, event: &DetectionEvent) {
        match self.sender.try_send(event.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                warn!(attempt = event.attempt(), "event channel full, dropping event");
            }
            Err(TrySendError::Disconnected(_)) => {
                self.dropped += 1;
            }
        }
    }
}
