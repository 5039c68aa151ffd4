//! Human-vs-bot decision over a sampled trajectory.
//!
//! The rule is deliberately literal: a trajectory is human-like when any
//! angle between consecutive displacement vectors is strictly below the
//! threshold. Straight, constant-direction motion therefore measures 0
//! degrees and counts as sharp, while a path of right-angle turns (90 degrees)
//! does not.

use crate::core::geometry::{displacement_vectors, turn_angles, DisplacementVector};
use crate::core::sampler::Sample;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default sharp-angle threshold in degrees.
pub const DEFAULT_THRESHOLD_DEGREES: f64 = 45.0;

/// Final judgement for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Human,
    BotLike,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Human => write!(f, "HUMAN BEHAVIOR CONFIRMED"),
            Verdict::BotLike => write!(f, "BOT-LIKE BEHAVIOR"),
        }
    }
}

/// Angle between vector `from` and vector `to` (`to == from + 1`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleReading {
    pub from: usize,
    pub to: usize,
    pub degrees: f64,
    pub sharp: bool,
}

/// Itemized analysis of one sampled trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptResult {
    pub is_human: bool,
    pub vectors: Vec<DisplacementVector>,
    pub angles: Vec<AngleReading>,
    /// Threshold the angles were judged against
    pub threshold_degrees: f64,
}

impl AttemptResult {
    pub fn verdict(&self) -> Verdict {
        if self.is_human {
            Verdict::Human
        } else {
            Verdict::BotLike
        }
    }

    pub fn sharp_count(&self) -> usize {
        self.angles.iter().filter(|a| a.sharp).count()
    }

    /// Smallest measured angle, if any angle was measured.
    pub fn min_angle(&self) -> Option<f64> {
        self.angles.iter().map(|a| a.degrees).reduce(f64::min)
    }
}

/// Threshold-based trajectory classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classifier {
    threshold_degrees: f64,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD_DEGREES)
    }
}

impl Classifier {
    pub fn new(threshold_degrees: f64) -> Self {
        Self { threshold_degrees }
    }

    pub fn threshold_degrees(&self) -> f64 {
        self.threshold_degrees
    }

    /// Classify a sample sequence.
    ///
    /// Sequences shorter than three samples produce no angles and are
    /// judged bot-like.
    pub fn classify(&self, samples: &[Sample]) -> AttemptResult {
        let points: Vec<(f64, f64)> = samples.iter().map(|s| (s.x, s.y)).collect();
        self.classify_points(&points)
    }

    /// Classify raw points, without timestamps.
    pub fn classify_points(&self, points: &[(f64, f64)]) -> AttemptResult {
        let vectors = displacement_vectors(points);
        let angles: Vec<AngleReading> = turn_angles(&vectors)
            .into_iter()
            .enumerate()
            .map(|(i, degrees)| AngleReading {
                from: i,
                to: i + 1,
                degrees,
                sharp: degrees < self.threshold_degrees,
            })
            .collect();

        let is_human = angles.iter().any(|a| a.sharp);

        AttemptResult {
            is_human,
            vectors,
            angles,
            threshold_degrees: self.threshold_degrees,
        }
    }
}

/// Classify with the default 45 degree threshold.
pub fn classify(samples: &[Sample]) -> AttemptResult {
    Classifier::default().classify(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const EPS: f64 = 1e-9;

    fn samples(points: &[(f64, f64)]) -> Vec<Sample> {
        points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Sample::new(x, y, Duration::from_millis(50 * i as u64)))
            .collect()
    }

    #[test]
    fn test_default_configuration_counts() {
        let result = classify(&samples(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (20.0, 15.0),
            (25.0, 30.0),
        ]));
        assert_eq!(result.vectors.len(), 4);
        assert_eq!(result.angles.len(), 3);
        assert_eq!(result.threshold_degrees, DEFAULT_THRESHOLD_DEGREES);
        for (i, angle) in result.angles.iter().enumerate() {
            assert_eq!((angle.from, angle.to), (i, i + 1));
        }
    }

    #[test]
    fn test_collinear_same_direction_counts_as_sharp() {
        let result = classify(&samples(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]));
        assert_eq!(result.angles.len(), 1);
        assert!(result.angles[0].degrees.abs() < EPS);
        assert!(result.angles[0].sharp);
        assert!(result.is_human);
        assert_eq!(result.verdict(), Verdict::Human);
    }

    #[test]
    fn test_right_angle_is_not_sharp() {
        let result = classify(&samples(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]));
        let v = &result.vectors;
        assert_eq!((v[0].dx, v[0].dy), (10.0, 0.0));
        assert_eq!((v[1].dx, v[1].dy), (0.0, 10.0));
        assert!((result.angles[0].degrees - 90.0).abs() < EPS);
        assert!(!result.angles[0].sharp);
        assert!(!result.is_human);
    }

    #[test]
    fn test_straight_line_is_human_under_literal_rule() {
        let result = classify(&samples(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (20.0, 0.0),
            (30.0, 0.0),
            (40.0, 0.0),
        ]));
        assert_eq!(result.angles.len(), 3);
        assert!(result.angles.iter().all(|a| a.degrees.abs() < EPS && a.sharp));
        assert!(result.is_human);
        assert_eq!(result.sharp_count(), 3);
    }

    #[test]
    fn test_square_zigzag_is_bot_like_under_literal_rule() {
        let result = classify(&samples(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
            (0.0, 0.0),
        ]));
        assert!(result
            .angles
            .iter()
            .all(|a| (a.degrees - 90.0).abs() < EPS && !a.sharp));
        assert!(!result.is_human);
        assert_eq!(result.verdict(), Verdict::BotLike);
    }

    #[test]
    fn test_threshold_comparison_is_strict() {
        // 45 degree turn exactly: (10,0) then (10,10).
        let points = [(0.0, 0.0), (10.0, 0.0), (20.0, 10.0)];
        let at_threshold = Classifier::new(45.0).classify_points(&points);
        assert!((at_threshold.angles[0].degrees - 45.0).abs() < 1e-6);

        let just_above = Classifier::new(45.001).classify_points(&points);
        assert!(just_above.is_human);

        let just_below = Classifier::new(44.999).classify_points(&points);
        assert!(!just_below.is_human);
    }

    #[test]
    fn test_reversal_is_180_and_not_sharp() {
        let result = classify(&samples(&[(0.0, 0.0), (10.0, 0.0), (0.0, 0.0)]));
        assert!((result.angles[0].degrees - 180.0).abs() < 1e-6);
        assert!(!result.is_human);
    }

    #[test]
    fn test_degenerate_input_defines_zero_angle() {
        let result = classify(&samples(&[(5.0, 5.0), (5.0, 5.0), (9.0, 2.0)]));
        assert_eq!(result.vectors[0].magnitude, 0.0);
        assert_eq!(result.angles[0].degrees, 0.0);
        assert!(result.is_human);
    }

    #[test]
    fn test_short_sequences_have_no_angles() {
        assert!(!classify(&[]).is_human);

        let two = classify(&samples(&[(0.0, 0.0), (3.0, 4.0)]));
        assert_eq!(two.vectors.len(), 1);
        assert!(two.angles.is_empty());
        assert!(!two.is_human);
        assert_eq!(two.min_angle(), None);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let input = samples(&[(3.0, 1.0), (8.0, 4.0), (9.0, 12.0), (2.0, 15.0), (0.0, 7.0)]);
        assert_eq!(classify(&input), classify(&input));
    }

    #[test]
    fn test_min_angle() {
        let result = classify(&samples(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (10.0, 20.0),
        ]));
        assert!(result.min_angle().unwrap().abs() < EPS);
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Human.to_string(), "HUMAN BEHAVIOR CONFIRMED");
        assert_eq!(Verdict::BotLike.to_string(), "BOT-LIKE BEHAVIOR");
    }
}
