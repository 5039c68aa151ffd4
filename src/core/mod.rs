//! Core detection logic.
//!
//! This module contains:
//! - Rate-limited, de-duplicated sampling of pointer positions
//! - Vector and angle geometry over the sampled path
//! - The threshold classifier
//! - The retry controller tying them together

pub mod classifier;
pub mod clock;
pub mod controller;
pub mod geometry;
pub mod sampler;

// Re-export commonly used types
pub use classifier::{
    classify, AngleReading, AttemptResult, Classifier, Verdict, DEFAULT_THRESHOLD_DEGREES,
};
pub use clock::{CancellationToken, Clock, ManualClock, SystemClock};
pub use controller::{
    DetectionError, DetectionEvent, DetectionOutcome, DetectionSettings, Phase, RetryController,
    DEFAULT_COOLDOWN,
};
pub use geometry::{angle_between, DisplacementVector};
pub use sampler::{
    capture, Sample, SamplerError, SamplerSettings, DEFAULT_POLL_INTERVAL, DEFAULT_SAMPLE_COUNT,
    DEFAULT_SAMPLE_INTERVAL,
};
