//! Consumers of detection events.
//!
//! The controller only emits [`DetectionEvent`]s; everything that turns them
//! into text, JSON, or messages for another thread lives here.

pub mod channel;
pub mod console;
pub mod json;

use crate::core::controller::DetectionEvent;

pub use channel::ChannelReporter;
pub use console::ConsoleReporter;
pub use json::JsonLinesReporter;

/// Receives every event of a detection run, in order.
pub trait Reporter {
    fn report(&mut self, event: &DetectionEvent);
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, event: &DetectionEvent) {
        (**self).report(event)
    }
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn report(&mut self, event: &DetectionEvent) {
        (**self).report(event)
    }
}

/// Fan out to two reporters.
impl<A: Reporter, B: Reporter> Reporter for (A, B) {
    fn report(&mut self, event: &DetectionEvent) {
        self.0.report(event);
        self.1.report(event);
    }
}

/// Collects events in memory.
impl Reporter for Vec<DetectionEvent> {
    fn report(&mut self, event: &DetectionEvent) {
        self.push(event.clone());
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&mut self, _event: &DetectionEvent) {}
}
