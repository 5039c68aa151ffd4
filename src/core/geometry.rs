//! Displacement vectors and inter-vector angles.
//!
//! Everything here is pure arithmetic on finite reals and never fails. A
//! zero-length vector has no direction; angles involving one are defined as
//! 0 degrees.

use serde::{Deserialize, Serialize};

/// The directed difference between two consecutive positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplacementVector {
    pub dx: f64,
    pub dy: f64,
    /// Euclidean length of `(dx, dy)`
    pub magnitude: f64,
}

impl DisplacementVector {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self {
            dx,
            dy,
            magnitude: dx.hypot(dy),
        }
    }

    /// Vector pointing from `from` to `to`.
    pub fn between(from: (f64, f64), to: (f64, f64)) -> Self {
        Self::new(to.0 - from.0, to.1 - from.1)
    }

    pub fn dot(&self, other: &DisplacementVector) -> f64 {
        self.dx * other.dx + self.dy * other.dy
    }

    pub fn is_degenerate(&self) -> bool {
        self.magnitude == 0.0
    }

    /// Angle between `self` and `other` in degrees, in `[0, 180]`.
    pub fn angle_to(&self, other: &DisplacementVector) -> f64 {
        angle_between(self, other)
    }
}

/// Angle between two vectors in degrees.
///
/// The cosine is clamped to `[-1, 1]` before `acos` since rounding can push
/// it just outside the domain for (anti)parallel vectors.
pub fn angle_between(a: &DisplacementVector, b: &DisplacementVector) -> f64 {
    if a.is_degenerate() || b.is_degenerate() {
        return 0.0;
    }
    let cos = (a.dot(b) / (a.magnitude * b.magnitude)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Vectors between each adjacent pair of points.
pub fn displacement_vectors(points: &[(f64, f64)]) -> Vec<DisplacementVector> {
    points
        .windows(2)
        .map(|pair| DisplacementVector::between(pair[0], pair[1]))
        .collect()
}

/// Angles between each adjacent pair of vectors.
pub fn turn_angles(vectors: &[DisplacementVector]) -> Vec<f64> {
    vectors
        .windows(2)
        .map(|pair| angle_between(&pair[0], &pair[1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_magnitude_is_euclidean() {
        let v = DisplacementVector::new(3.0, 4.0);
        assert!((v.magnitude - 5.0).abs() < EPS);
    }

    #[test]
    fn test_same_direction_is_zero_degrees() {
        let a = DisplacementVector::new(1.0, 0.0);
        let b = DisplacementVector::new(7.0, 0.0);
        assert!(angle_between(&a, &b).abs() < EPS);
    }

    #[test]
    fn test_right_angle() {
        let a = DisplacementVector::new(10.0, 0.0);
        let b = DisplacementVector::new(0.0, 10.0);
        assert!((a.angle_to(&b) - 90.0).abs() < EPS);
    }

    #[test]
    fn test_reversal_is_180_degrees() {
        let a = DisplacementVector::new(2.0, 2.0);
        let b = DisplacementVector::new(-3.0, -3.0);
        assert!((angle_between(&a, &b) - 180.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_vector_yields_zero() {
        let zero = DisplacementVector::new(0.0, 0.0);
        let v = DisplacementVector::new(1.0, 1.0);
        assert!(zero.is_degenerate());
        assert_eq!(angle_between(&zero, &v), 0.0);
        assert_eq!(angle_between(&v, &zero), 0.0);
    }

    #[test]
    fn test_nearly_parallel_stays_in_domain() {
        // Large, almost-collinear vectors where dot/(|a||b|) can round past 1.
        let a = DisplacementVector::new(1e8, 1.0);
        let b = DisplacementVector::new(1e8 + 1.0, 1.0);
        let angle = angle_between(&a, &b);
        assert!(angle.is_finite());
        assert!((0.0..=180.0).contains(&angle));
    }

    #[test]
    fn test_angles_in_range_for_many_directions() {
        let vectors: Vec<DisplacementVector> = (0..36)
            .map(|i| {
                let theta = (i as f64 * 10.0).to_radians();
                DisplacementVector::new(theta.cos() * 25.0, theta.sin() * 25.0)
            })
            .collect();
        for a in &vectors {
            for b in &vectors {
                let angle = angle_between(a, b);
                assert!((0.0..=180.0).contains(&angle), "angle {angle} out of range");
            }
        }
    }

    #[test]
    fn test_vector_and_angle_counts() {
        let points = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (2.0, 1.0), (2.0, 2.0)];
        let vectors = displacement_vectors(&points);
        assert_eq!(vectors.len(), 4);
        assert_eq!(turn_angles(&vectors).len(), 3);
        assert!(displacement_vectors(&points[..1]).is_empty());
    }
}
