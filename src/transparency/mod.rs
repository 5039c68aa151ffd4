//! Transparency module for cursor-verify.
//!
//! Tracks what a detection session sampled and decided, so the operator can
//! see how a verdict was reached.

pub mod log;

// Re-export commonly used types
pub use log::{create_shared_log, SessionLog, SessionStats, SharedSessionLog};
