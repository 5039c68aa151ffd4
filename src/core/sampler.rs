//! Rate-limited, de-duplicated position capture.
//!
//! The sampler polls a position source every `poll_interval` and accepts a
//! reading as a new sample only when at least `sample_interval` has passed
//! since the previous accepted sample and the position differs from it. A
//! completed sequence therefore never contains two consecutive samples at the
//! same position.

use crate::collector::types::{PointerPosition, PositionSource, ReadError};
use crate::core::clock::{CancellationToken, Clock};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace};

/// Default number of samples per attempt.
pub const DEFAULT_SAMPLE_COUNT: usize = 5;

/// Default minimum spacing between accepted samples.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(50);

/// Default spacing between polls of the source.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// A pointer position accepted by the sampler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    /// Elapsed time since the first poll of the attempt
    #[serde(rename = "t_ms", with = "crate::config::duration_ms")]
    pub t: Duration,
}

impl Sample {
    pub fn new(x: f64, y: f64, t: Duration) -> Self {
        Self { x, y, t }
    }

    fn same_position(&self, pos: PointerPosition) -> bool {
        self.x == f64::from(pos.x) && self.y == f64::from(pos.y)
    }
}

/// Capture parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerSettings {
    pub sample_count: usize,
    pub sample_interval: Duration,
    pub poll_interval: Duration,
    /// Give up after this long without completing the sequence
    pub capture_timeout: Option<Duration>,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            poll_interval: DEFAULT_POLL_INTERVAL,
            capture_timeout: None,
        }
    }
}

/// Capture failures. None of these yield a partial sequence.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplerError {
    #[error("position source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("capture cancelled after {captured} of {required} samples")]
    Cancelled { captured: usize, required: usize },
    #[error("capture timed out after {elapsed:?} with {captured} of {required} samples")]
    TimedOut {
        elapsed: Duration,
        captured: usize,
        required: usize,
    },
}

/// Capture `settings.sample_count` samples from `source`.
///
/// Blocks until the sequence is complete unless a timeout is configured or
/// `cancel` is triggered. An idle pointer never produces new samples.
pub fn capture<S, C>(
    source: &mut S,
    clock: &C,
    settings: &SamplerSettings,
    cancel: &CancellationToken,
) -> Result<Vec<Sample>, SamplerError>
where
    S: PositionSource + ?Sized,
    C: Clock + ?Sized,
{
    let required = settings.sample_count;
    let mut samples: Vec<Sample> = Vec::with_capacity(required);
    let start = clock.now();
    let mut last_accepted_at: Option<Duration> = None;

    while samples.len() < required {
        if cancel.is_cancelled() {
            return Err(SamplerError::Cancelled {
                captured: samples.len(),
                required,
            });
        }

        let now = clock.now();
        let elapsed = now.saturating_sub(start);
        if let Some(timeout) = settings.capture_timeout {
            if elapsed >= timeout {
                return Err(SamplerError::TimedOut {
                    elapsed,
                    captured: samples.len(),
                    required,
                });
            }
        }

        match source.read_position() {
            Ok(pos) => {
                let interval_ok = last_accepted_at
                    .map_or(true, |at| now.saturating_sub(at) >= settings.sample_interval);
                let moved = samples.last().map_or(true, |prev| !prev.same_position(pos));

                if interval_ok && moved {
                    let sample = Sample::new(f64::from(pos.x), f64::from(pos.y), elapsed);
                    debug!(
                        index = samples.len(),
                        x = pos.x,
                        y = pos.y,
                        t_ms = elapsed.as_millis() as u64,
                        "sample accepted"
                    );
                    samples.push(sample);
                    last_accepted_at = Some(now);
                    if samples.len() == required {
                        break;
                    }
                } else {
                    trace!(interval_ok, moved, "poll skipped");
                }
            }
            Err(ReadError::Transient(reason)) => {
                trace!(%reason, "transient read failure");
            }
            Err(ReadError::Unavailable(reason)) => {
                return Err(SamplerError::SourceUnavailable(reason));
            }
        }

        clock.sleep(settings.poll_interval);
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::ReplaySource;
    use crate::core::clock::ManualClock;

    fn settings() -> SamplerSettings {
        SamplerSettings::default()
    }

    #[test]
    fn test_captures_requested_count() {
        let mut source =
            ReplaySource::from_positions([(0, 0), (10, 0), (20, 5), (25, 15), (30, 30)], 5);
        let clock = ManualClock::new();
        let samples = capture(&mut source, &clock, &settings(), &CancellationToken::new()).unwrap();

        assert_eq!(samples.len(), 5);
        assert_eq!((samples[0].x, samples[0].y), (0.0, 0.0));
        assert_eq!((samples[4].x, samples[4].y), (30.0, 30.0));
        assert_eq!(samples[0].t, Duration::ZERO);
    }

    #[test]
    fn test_interval_and_movement_invariants() {
        // Every poll moves the pointer, so only the interval gate limits intake.
        let positions: Vec<(i32, i32)> = (0..200).map(|i| (i, i * 2)).collect();
        let mut source = ReplaySource::from_positions(positions, 1);
        let clock = ManualClock::new();
        let samples = capture(&mut source, &clock, &settings(), &CancellationToken::new()).unwrap();

        for pair in samples.windows(2) {
            assert!(pair[1].t - pair[0].t >= DEFAULT_SAMPLE_INTERVAL);
            assert!((pair[0].x, pair[0].y) != (pair[1].x, pair[1].y));
        }
    }

    #[test]
    fn test_repeated_position_never_advances() {
        // 40 identical reads, then the script runs out.
        let mut source = ReplaySource::from_positions([(7, 7)], 40);
        let clock = ManualClock::new();
        let err = capture(&mut source, &clock, &settings(), &CancellationToken::new()).unwrap_err();

        assert!(matches!(err, SamplerError::SourceUnavailable(_)));
        assert_eq!(source.reads(), 41);
    }

    #[test]
    fn test_dedup_compares_against_last_accepted_only() {
        // Returning to an earlier (non-adjacent) position is a valid sample.
        let mut source = ReplaySource::from_positions([(0, 0), (5, 0), (0, 0)], 5);
        let clock = ManualClock::new();
        let s = SamplerSettings {
            sample_count: 3,
            ..settings()
        };
        let samples = capture(&mut source, &clock, &s, &CancellationToken::new()).unwrap();
        assert_eq!(samples[2].x, 0.0);
    }

    #[test]
    fn test_transient_failures_are_skipped() {
        let mut reads = vec![Err(ReadError::Transient("busy".into())); 3];
        for i in 0..3 {
            for _ in 0..5 {
                reads.push(Ok(PointerPosition::new(i * 10, 0)));
            }
        }
        let mut source = ReplaySource::from_reads(reads);
        let clock = ManualClock::new();
        let s = SamplerSettings {
            sample_count: 3,
            ..settings()
        };
        let samples = capture(&mut source, &clock, &s, &CancellationToken::new()).unwrap();

        assert_eq!(samples.len(), 3);
        // First accepted read came after three skipped polls.
        assert_eq!(samples[0].t, Duration::from_millis(30));
    }

    #[test]
    fn test_unavailable_source_returns_no_partial_sequence() {
        let mut source = ReplaySource::from_reads([
            Ok(PointerPosition::new(1, 1)),
            Err(ReadError::Unavailable("unplugged".into())),
        ]);
        let clock = ManualClock::new();
        let err = capture(&mut source, &clock, &settings(), &CancellationToken::new()).unwrap_err();
        assert_eq!(err, SamplerError::SourceUnavailable("unplugged".into()));
    }

    #[test]
    fn test_cancellation_checked_before_poll() {
        let mut source = ReplaySource::from_positions([(1, 1)], 10);
        let clock = ManualClock::new();
        let token = CancellationToken::new();
        token.cancel();

        let err = capture(&mut source, &clock, &settings(), &token).unwrap_err();
        assert_eq!(
            err,
            SamplerError::Cancelled {
                captured: 0,
                required: 5
            }
        );
        assert_eq!(source.reads(), 0);
    }

    #[test]
    fn test_timeout_on_idle_pointer() {
        let mut source = ReplaySource::from_positions([(3, 3)], 1_000);
        let clock = ManualClock::new();
        let s = SamplerSettings {
            capture_timeout: Some(Duration::from_millis(200)),
            ..settings()
        };
        let err = capture(&mut source, &clock, &s, &CancellationToken::new()).unwrap_err();

        match err {
            SamplerError::TimedOut {
                elapsed, captured, ..
            } => {
                assert_eq!(elapsed, Duration::from_millis(200));
                assert_eq!(captured, 1);
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[test]
    fn test_timestamps_relative_to_attempt_start() {
        let clock = ManualClock::new();
        clock.advance(Duration::from_secs(30));
        let mut source = ReplaySource::from_positions([(0, 0), (1, 1), (2, 0)], 5);
        let s = SamplerSettings {
            sample_count: 3,
            ..settings()
        };
        let samples = capture(&mut source, &clock, &s, &CancellationToken::new()).unwrap();

        assert_eq!(samples[0].t, Duration::ZERO);
        assert_eq!(samples[1].t, Duration::from_millis(50));
        assert_eq!(samples[2].t, Duration::from_millis(100));
    }
}
