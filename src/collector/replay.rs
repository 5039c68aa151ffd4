//! Scripted position source for headless runs and tests.
//!
//! Each recorded position is returned for `hold_polls` consecutive reads, so a
//! script of N distinct points survives the sampler's interval gate when
//! `hold_polls * poll_interval >= sample_interval`. Once the script is
//! exhausted the source reports itself unavailable.

use crate::collector::types::{PointerPosition, PositionSource, ReadError};
use serde::Deserialize;
use std::collections::VecDeque;
use std::path::Path;
use thiserror::Error;

/// Errors loading a replay script.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("replay script contains no positions")]
    Empty,
    #[error("point {index} has coordinates outside the screen range: ({x}, {y})")]
    OutOfRange { index: usize, x: f64, y: f64 },
}

/// One step of a scripted read sequence.
#[derive(Debug, Clone, PartialEq)]
enum Step {
    Position(PointerPosition),
    Fail(ReadError),
}

/// Point as it appears in a replay file. Coordinates may be fractional in
/// exported traces; they are rounded to whole pixels.
#[derive(Debug, Deserialize)]
struct ReplayPoint {
    x: f64,
    y: f64,
}

/// Round to a whole pixel, or `None` if the result does not fit in `i32`.
fn to_pixel(value: f64) -> Option<i32> {
    let rounded = value.round();
    if (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&rounded) {
        Some(rounded as i32)
    } else {
        None
    }
}

/// A position source that plays back a fixed script.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    steps: VecDeque<Step>,
    reads: u64,
}

impl ReplaySource {
    /// Play back `positions`, returning each one for `hold_polls` reads.
    pub fn from_positions<I, P>(positions: I, hold_polls: usize) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PointerPosition>,
    {
        let hold = hold_polls.max(1);
        let steps = positions
            .into_iter()
            .map(Into::into)
            .flat_map(|p| std::iter::repeat(Step::Position(p)).take(hold))
            .collect();
        Self { steps, reads: 0 }
    }

    /// Play back a raw read sequence, one entry per poll. Useful for
    /// scripting transient failures in between positions.
    pub fn from_reads<I>(reads: I) -> Self
    where
        I: IntoIterator<Item = Result<PointerPosition, ReadError>>,
    {
        let steps = reads
            .into_iter()
            .map(|r| match r {
                Ok(p) => Step::Position(p),
                Err(e) => Step::Fail(e),
            })
            .collect();
        Self { steps, reads: 0 }
    }

    /// Load a JSON array of `{"x": .., "y": ..}` objects.
    pub fn from_json_file(path: &Path, hold_polls: usize) -> Result<Self, ReplayError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content, hold_polls)
    }

    pub fn from_json_str(json: &str, hold_polls: usize) -> Result<Self, ReplayError> {
        let points: Vec<ReplayPoint> = serde_json::from_str(json)?;
        if points.is_empty() {
            return Err(ReplayError::Empty);
        }
        let positions = points
            .iter()
            .enumerate()
            .map(|(index, p)| match (to_pixel(p.x), to_pixel(p.y)) {
                (Some(x), Some(y)) => Ok(PointerPosition::new(x, y)),
                _ => Err(ReplayError::OutOfRange {
                    index,
                    x: p.x,
                    y: p.y,
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_positions(positions, hold_polls))
    }

    /// Number of reads served so far.
    pub fn reads(&self) -> u64 {
        self.reads
    }

    /// Number of scripted reads not yet served.
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl PositionSource for ReplaySource {
    fn read_position(&mut self) -> Result<PointerPosition, ReadError> {
        self.reads += 1;
        match self.steps.pop_front() {
            Some(Step::Position(p)) => Ok(p),
            Some(Step::Fail(e)) => Err(e),
            None => Err(ReadError::Unavailable("replay exhausted".to_string())),
        }
    }
}
