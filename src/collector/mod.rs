//! Pointer position sources.
//!
//! This module provides platform-specific adapters for reading the current
//! cursor position, plus a scripted source for headless runs.

pub mod replay;
pub mod types;

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub mod noop;

// Re-export commonly used types
pub use replay::{ReplayError, ReplaySource};
pub use types::{PointerPosition, PositionSource, ReadError};

#[cfg(target_os = "macos")]
pub use macos::{check_available, MacOSCursorSource};

/// Platform-agnostic source type alias
#[cfg(target_os = "macos")]
pub type SystemSource = MacOSCursorSource;

#[cfg(target_os = "windows")]
pub use windows::{check_available, WindowsCursorSource};

/// Platform-agnostic source type alias
#[cfg(target_os = "windows")]
pub type SystemSource = WindowsCursorSource;

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub use noop::{check_available, UnsupportedSource};

/// Platform-agnostic source type alias
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub type SystemSource = UnsupportedSource;
