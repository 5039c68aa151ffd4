//! Fallback position source for targets without a native adapter.
//!
//! This exists so the crate (and binary) compile everywhere. Every read
//! reports the source as unavailable, which ends a detection run immediately
//! with a clear status instead of blocking forever.

use crate::collector::types::{PointerPosition, PositionSource, ReadError};

/// A source that can never produce a position.
#[derive(Debug, Default)]
pub struct UnsupportedSource {
    _private: (),
}

impl UnsupportedSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PositionSource for UnsupportedSource {
    fn read_position(&mut self) -> Result<PointerPosition, ReadError> {
        Err(ReadError::Unavailable(format!(
            "no pointer position adapter for target '{}'",
            std::env::consts::OS
        )))
    }
}

/// There is no native cursor access on this target.
pub fn check_available() -> bool {
    false
}
