//! macOS position source using a Core Graphics event snapshot.
//!
//! Creating a bare `CGEvent` from a combined-session event source yields an
//! event whose location is the current cursor position. Unlike the event-tap
//! approach this needs no Input Monitoring permission.

use crate::collector::types::{PointerPosition, PositionSource, ReadError};
use core_graphics::event::CGEvent;
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};

/// Reads the system cursor position on macOS.
#[derive(Debug, Default)]
pub struct MacOSCursorSource {
    _private: (),
}

impl MacOSCursorSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PositionSource for MacOSCursorSource {
    fn read_position(&mut self) -> Result<PointerPosition, ReadError> {
        // CGEvent::new consumes its source, so one is created per read.
        let source = CGEventSource::new(CGEventSourceStateID::CombinedSessionState).map_err(
            |_| ReadError::Unavailable("could not create CGEventSource".to_string()),
        )?;
        let event = CGEvent::new(source)
            .map_err(|_| ReadError::Transient("could not create CGEvent".to_string()))?;
        let location = event.location();
        Ok(PointerPosition::new(
            location.x.round() as i32,
            location.y.round() as i32,
        ))
    }
}

/// Check whether the cursor position can be read from this session.
pub fn check_available() -> bool {
    MacOSCursorSource::new().read_position().is_ok()
}
