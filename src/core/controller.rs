//! Retry controller: sample, classify, and repeat until a human verdict.
//!
//! ```text
//!  ┌──────────┐  samples   ┌─────────────┐  human   ┌─────────┐
//!  │ Sampling │──────────▶│ Classifying │────────▶│ Success │
//!  └──────────┘            └─────────────┘          └─────────┘
//!       ▲                        │ bot-like
//!       │      cooldown     ┌────▼────┐
//!       └───────────────────│  Retry  │
//!                           └─────────┘
//! ```
//!
//! Every transition is reported as a [`DetectionEvent`]. The controller does
//! no formatting of its own.

use crate::collector::types::PositionSource;
use crate::core::classifier::{AttemptResult, Classifier, DEFAULT_THRESHOLD_DEGREES};
use crate::core::clock::{sleep_cancellable, CancellationToken, Clock};
use crate::core::sampler::{capture, Sample, SamplerError, SamplerSettings};
use crate::report::Reporter;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, info_span, warn};

/// Default pause between a bot-like attempt and the next one.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(500);

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Sampling,
    Classifying,
    Retry,
    Success,
}

/// Structured progress event emitted on every state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DetectionEvent {
    /// Entered `Sampling` for a new attempt
    AttemptStarted { attempt: u32, sample_count: usize },
    /// Left `Classifying` with a result
    Analyzed {
        attempt: u32,
        samples: Vec<Sample>,
        result: AttemptResult,
    },
    /// Entered `Retry`; the next attempt starts after `cooldown`
    Retrying {
        attempt: u32,
        #[serde(rename = "cooldown_ms", with = "crate::config::duration_ms")]
        cooldown: Duration,
    },
    /// Reached `Success`
    Succeeded { attempt: u32 },
}

impl DetectionEvent {
    pub fn attempt(&self) -> u32 {
        match self {
            DetectionEvent::AttemptStarted { attempt, .. }
            | DetectionEvent::Analyzed { attempt, .. }
            | DetectionEvent::Retrying { attempt, .. }
            | DetectionEvent::Succeeded { attempt } => *attempt,
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            DetectionEvent::AttemptStarted { .. } => Phase::Sampling,
            DetectionEvent::Analyzed { .. } => Phase::Classifying,
            DetectionEvent::Retrying { .. } => Phase::Retry,
            DetectionEvent::Succeeded { .. } => Phase::Success,
        }
    }
}

/// Everything the controller needs to know about one detection run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionSettings {
    pub sampler: SamplerSettings,
    pub threshold_degrees: f64,
    pub cooldown: Duration,
    /// Stop after this many bot-like attempts; `None` retries forever
    pub max_attempts: Option<u32>,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            sampler: SamplerSettings::default(),
            threshold_degrees: DEFAULT_THRESHOLD_DEGREES,
            cooldown: DEFAULT_COOLDOWN,
            max_attempts: None,
        }
    }
}

/// How a run ended without an error.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionOutcome {
    /// A human-like trajectory was observed on attempt `attempts`
    Human { attempts: u32, result: AttemptResult },
    /// The attempt bound was reached without a human verdict
    Exhausted { attempts: u32 },
}

impl DetectionOutcome {
    pub fn is_human(&self) -> bool {
        matches!(self, DetectionOutcome::Human { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            DetectionOutcome::Human { attempts, .. } | DetectionOutcome::Exhausted { attempts } => {
                *attempts
            }
        }
    }
}

/// Run-ending failures. A bot-like verdict is never one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectionError {
    #[error("attempt {attempt}: position source unavailable: {reason}")]
    SourceUnavailable { attempt: u32, reason: String },
    #[error("attempt {attempt}: detection cancelled")]
    Cancelled { attempt: u32 },
    #[error("attempt {attempt}: capture timed out after {elapsed:?}")]
    TimedOut { attempt: u32, elapsed: Duration },
}

impl DetectionError {
    fn from_sampler(attempt: u32, err: SamplerError) -> Self {
        match err {
            SamplerError::SourceUnavailable(reason) => {
                DetectionError::SourceUnavailable { attempt, reason }
            }
            SamplerError::Cancelled { .. } => DetectionError::Cancelled { attempt },
            SamplerError::TimedOut { elapsed, .. } => DetectionError::TimedOut { attempt, elapsed },
        }
    }
}

/// Drives Sampler and Classifier until a human-like trajectory is seen.
pub struct RetryController<S, C> {
    source: S,
    clock: C,
    settings: DetectionSettings,
    classifier: Classifier,
    cancel: CancellationToken,
}

impl<S: PositionSource, C: Clock> RetryController<S, C> {
    pub fn new(source: S, clock: C, settings: DetectionSettings) -> Self {
        Self {
            source,
            clock,
            classifier: Classifier::new(settings.threshold_degrees),
            settings,
            cancel: CancellationToken::new(),
        }
    }

    /// Use an externally owned cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that stops this controller at its next poll or cooldown slice.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Settings this controller was built with.
    pub fn settings(&self) -> &DetectionSettings {
        &self.settings
    }

    /// Give the position source back, e.g. to inspect a replay after a run.
    pub fn into_source(self) -> S {
        self.source
    }

    /// Run attempts until a human verdict, the attempt bound, or a fatal error.
    pub fn run<R: Reporter + ?Sized>(
        &mut self,
        reporter: &mut R,
    ) -> Result<DetectionOutcome, DetectionError> {
        let mut attempt: u32 = 1;

        loop {
            let span = info_span!("attempt", attempt);
            let _enter = span.enter();

            // Sampling
            reporter.report(&DetectionEvent::AttemptStarted {
                attempt,
                sample_count: self.settings.sampler.sample_count,
            });
            let samples = capture(
                &mut self.source,
                &self.clock,
                &self.settings.sampler,
                &self.cancel,
            )
            .map_err(|e| {
                warn!(error = %e, "capture failed");
                DetectionError::from_sampler(attempt, e)
            })?;

            // Classifying
            let result = self.classifier.classify(&samples);
            info!(
                is_human = result.is_human,
                sharp = result.sharp_count(),
                "attempt classified"
            );
            let is_human = result.is_human;
            reporter.report(&DetectionEvent::Analyzed {
                attempt,
                samples,
                result: result.clone(),
            });

            if is_human {
                reporter.report(&DetectionEvent::Succeeded { attempt });
                return Ok(DetectionOutcome::Human {
                    attempts: attempt,
                    result,
                });
            }

            if self
                .settings
                .max_attempts
                .is_some_and(|max| attempt >= max)
            {
                info!("attempt bound reached");
                return Ok(DetectionOutcome::Exhausted { attempts: attempt });
            }

            // Retry
            reporter.report(&DetectionEvent::Retrying {
                attempt,
                cooldown: self.settings.cooldown,
            });
            let completed = sleep_cancellable(
                &self.clock,
                self.settings.cooldown,
                self.settings.sampler.poll_interval,
                &self.cancel,
            );
            if !completed {
                return Err(DetectionError::Cancelled { attempt });
            }
            attempt += 1;
        }
    }
}
