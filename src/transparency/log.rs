//! In-memory session statistics.
//!
//! Counts what a detection session observed so it can be shown to the
//! operator at the end of a run. Nothing here is written to disk.

use crate::core::controller::DetectionEvent;
use crate::report::Reporter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Running counters for the current session.
#[derive(Debug)]
pub struct SessionLog {
    /// Number of attempts started
    attempts: AtomicU64,
    /// Number of samples that reached the classifier
    samples_captured: AtomicU64,
    /// Number of inter-vector angles measured
    angles_measured: AtomicU64,
    /// Number of those angles below the threshold
    sharp_angles: AtomicU64,
    human_verdicts: AtomicU64,
    bot_like_verdicts: AtomicU64,
    /// Session start time
    session_start: DateTime<Utc>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self {
            attempts: AtomicU64::new(0),
            samples_captured: AtomicU64::new(0),
            angles_measured: AtomicU64::new(0),
            sharp_angles: AtomicU64::new(0),
            human_verdicts: AtomicU64::new(0),
            bot_like_verdicts: AtomicU64::new(0),
            session_start: Utc::now(),
        }
    }

    /// Update counters from one detection event.
    pub fn record(&self, event: &DetectionEvent) {
        match event {
            DetectionEvent::AttemptStarted { .. } => {
                self.attempts.fetch_add(1, Ordering::Relaxed);
            }
            DetectionEvent::Analyzed {
                samples, result, ..
            } => {
                self.samples_captured
                    .fetch_add(samples.len() as u64, Ordering::Relaxed);
                self.angles_measured
                    .fetch_add(result.angles.len() as u64, Ordering::Relaxed);
                self.sharp_angles
                    .fetch_add(result.sharp_count() as u64, Ordering::Relaxed);
                if result.is_human {
                    self.human_verdicts.fetch_add(1, Ordering::Relaxed);
                } else {
                    self.bot_like_verdicts.fetch_add(1, Ordering::Relaxed);
                }
            }
            DetectionEvent::Retrying { .. } | DetectionEvent::Succeeded { .. } => {}
        }
    }

    /// Get the current statistics.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            attempts: self.attempts.load(Ordering::Relaxed),
            samples_captured: self.samples_captured.load(Ordering::Relaxed),
            angles_measured: self.angles_measured.load(Ordering::Relaxed),
            sharp_angles: self.sharp_angles.load(Ordering::Relaxed),
            human_verdicts: self.human_verdicts.load(Ordering::Relaxed),
            bot_like_verdicts: self.bot_like_verdicts.load(Ordering::Relaxed),
            session_start: self.session_start,
            session_duration_secs: (Utc::now() - self.session_start).num_seconds().max(0) as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        format!(
            "Session Statistics:\n\
             - Attempts: {}\n\
             - Samples captured: {}\n\
             - Angles measured: {} ({} sharp)\n\
             - Human verdicts: {}\n\
             - Bot-like verdicts: {}\n\
             - Session duration: {} seconds",
            stats.attempts,
            stats.samples_captured,
            stats.angles_measured,
            stats.sharp_angles,
            stats.human_verdicts,
            stats.bot_like_verdicts,
            stats.session_duration_secs
        )
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.attempts.store(0, Ordering::Relaxed);
        self.samples_captured.store(0, Ordering::Relaxed);
        self.angles_measured.store(0, Ordering::Relaxed);
        self.sharp_angles.store(0, Ordering::Relaxed);
        self.human_verdicts.store(0, Ordering::Relaxed);
        self.bot_like_verdicts.store(0, Ordering::Relaxed);
    }
}

impl Default for SessionLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of session statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub attempts: u64,
    pub samples_captured: u64,
    pub angles_measured: u64,
    pub sharp_angles: u64,
    pub human_verdicts: u64,
    pub bot_like_verdicts: u64,
    pub session_start: DateTime<Utc>,
    pub session_duration_secs: u64,
}

/// Thread-safe shared session log.
pub type SharedSessionLog = Arc<SessionLog>;

/// Create a new shared session log.
pub fn create_shared_log() -> SharedSessionLog {
    Arc::new(SessionLog::new())
}

impl Reporter for SharedSessionLog {
    fn report(&mut self, event: &DetectionEvent) {
        self.record(event);
    }
}

impl Reporter for SessionLog {
    fn report(&mut self, event: &DetectionEvent) {
        self.record(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classifier::Classifier;
    use crate::core::sampler::Sample;
    use std::time::Duration;

    fn analyzed(points: &[(f64, f64)]) -> DetectionEvent {
        let samples: Vec<Sample> = points
            .iter()
            .map(|&(x, y)| Sample::new(x, y, Duration::ZERO))
            .collect();
        let result = Classifier::default().classify(&samples);
        DetectionEvent::Analyzed {
            attempt: 1,
            samples,
            result,
        }
    }

    #[test]
    fn test_session_log_counting() {
        let log = SessionLog::new();

        log.record(&DetectionEvent::AttemptStarted {
            attempt: 1,
            sample_count: 3,
        });
        log.record(&analyzed(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]));
        log.record(&DetectionEvent::AttemptStarted {
            attempt: 2,
            sample_count: 3,
        });
        log.record(&analyzed(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]));

        let stats = log.stats();
        assert_eq!(stats.attempts, 2);
        assert_eq!(stats.samples_captured, 6);
        assert_eq!(stats.angles_measured, 2);
        assert_eq!(stats.sharp_angles, 1);
        assert_eq!(stats.human_verdicts, 1);
        assert_eq!(stats.bot_like_verdicts, 1);
    }

    #[test]
    fn test_shared_log_as_reporter() {
        let log = create_shared_log();
        let mut reporter = log.clone();
        reporter.report(&DetectionEvent::AttemptStarted {
            attempt: 1,
            sample_count: 5,
        });
        assert_eq!(log.stats().attempts, 1);
    }

    #[test]
    fn test_session_log_reset() {
        let log = SessionLog::new();
        log.record(&analyzed(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]));
        log.reset();

        let stats = log.stats();
        assert_eq!(stats.samples_captured, 0);
        assert_eq!(stats.human_verdicts, 0);
    }

    #[test]
    fn test_summary_format() {
        let log = SessionLog::new();
        let summary = log.summary();

        assert!(summary.contains("Attempts"));
        assert!(summary.contains("Angles measured"));
        assert!(summary.contains("Bot-like verdicts"));
    }
}
