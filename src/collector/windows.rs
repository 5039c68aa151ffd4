//! Windows position source backed by `GetCursorPos`.
//!
//! The call fails while the secure desktop (UAC prompt, lock screen) owns
//! input. That is reported as a transient failure so the sampler keeps
//! polling until the desktop comes back.

use crate::collector::types::{PointerPosition, PositionSource, ReadError};
use windows::Win32::Foundation::POINT;
use windows::Win32::UI::WindowsAndMessaging::GetCursorPos;

/// Reads the system cursor position on Windows.
#[derive(Debug, Default)]
pub struct WindowsCursorSource {
    _private: (),
}

impl WindowsCursorSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PositionSource for WindowsCursorSource {
    fn read_position(&mut self) -> Result<PointerPosition, ReadError> {
        let mut point = POINT::default();
        // SAFETY: `point` is a valid, writable POINT for the duration of the call.
        unsafe { GetCursorPos(&mut point) }
            .map_err(|e| ReadError::Transient(format!("GetCursorPos failed: {e}")))?;
        Ok(PointerPosition::new(point.x, point.y))
    }
}

/// Check whether the cursor position can be read from this session.
pub fn check_available() -> bool {
    WindowsCursorSource::new().read_position().is_ok()
}
