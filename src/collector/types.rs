//! Position-source types shared by every platform adapter.
//!
//! A source only answers "where is the pointer right now". Everything about
//! rate limiting, de-duplication and timing lives in the sampler.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An absolute pointer position in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

impl PointerPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for PointerPosition {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Why a single read produced no position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// Nothing usable this poll; the caller should simply poll again.
    #[error("transient read failure: {0}")]
    Transient(String),
    /// The source cannot be read at all.
    #[error("position source unavailable: {0}")]
    Unavailable(String),
}

impl ReadError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, ReadError::Unavailable(_))
    }
}

/// Pull-based access to the current pointer position.
///
/// Implementations must be cheap to call repeatedly; the sampler polls every
/// few milliseconds.
pub trait PositionSource {
    fn read_position(&mut self) -> Result<PointerPosition, ReadError>;
}

impl<S: PositionSource + ?Sized> PositionSource for &mut S {
    fn read_position(&mut self) -> Result<PointerPosition, ReadError> {
        (**self).read_position()
    }
}

impl<S: PositionSource + ?Sized> PositionSource for Box<S> {
    fn read_position(&mut self) -> Result<PointerPosition, ReadError> {
        (**self).read_position()
    }
}
