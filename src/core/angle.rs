//! Angle Engine: joint angles from landmark geometry
//!
//! Both angle functions use the dot-product / arccos form with the cosine
//! clamped to [-1, 1], so the result is always in [0, 180] degrees.
//! Zero-length rays and non-finite input yield 0.

use crate::error::Result;
use crate::types::{AngleSet, Landmark, PoseLandmark};

/// Rays shorter than this are treated as zero-length
const MIN_RAY_LENGTH: f64 = 1e-9;

/// Angle at `p2` between the rays toward `p1` and `p3`, in degrees
pub fn angle_at_vertex(p1: Landmark, p2: Landmark, p3: Landmark) -> f64 {
    let v1 = (p1.x - p2.x, p1.y - p2.y);
    let v2 = (p3.x - p2.x, p3.y - p2.y);
    angle_between(v1, v2)
}

/// Angle between the vector b → a and the vertical reference (0, -1), in degrees
pub fn angle_from_vertical(a: Landmark, b: Landmark) -> f64 {
    let v = (a.x - b.x, a.y - b.y);
    angle_between(v, (0.0, -1.0))
}

fn angle_between(v1: (f64, f64), v2: (f64, f64)) -> f64 {
    let mag1 = v1.0.hypot(v1.1);
    let mag2 = v2.0.hypot(v2.1);

    if !(mag1.is_finite() && mag2.is_finite()) || mag1 < MIN_RAY_LENGTH || mag2 < MIN_RAY_LENGTH {
        return 0.0;
    }

    let dot = v1.0 * v2.0 + v1.1 * v2.1;
    let cos_angle = (dot / (mag1 * mag2)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

/// Derive the full [`AngleSet`] for one frame.
///
/// Fails with `MissingLandmark` / `NonFiniteLandmark` naming the first bad
/// index; the caller decides whether to skip the frame.
pub fn derive_angles(landmarks: &[Landmark]) -> Result<AngleSet> {
    let nose = PoseLandmark::Nose.from_frame(landmarks)?;
    let shoulder = PoseLandmark::Shoulder.from_frame(landmarks)?;
    let elbow = PoseLandmark::Elbow.from_frame(landmarks)?;
    let wrist = PoseLandmark::Wrist.from_frame(landmarks)?;
    let hip = PoseLandmark::Hip.from_frame(landmarks)?;
    let knee = PoseLandmark::Knee.from_frame(landmarks)?;
    let ankle = PoseLandmark::Ankle.from_frame(landmarks)?;

    Ok(AngleSet {
        knee: angle_at_vertex(hip, knee, ankle),
        hip: angle_at_vertex(shoulder, hip, knee),
        arm: angle_at_vertex(shoulder, elbow, wrist),
        leg: angle_from_vertical(knee, ankle),
        chest: angle_from_vertical(shoulder, hip),
        abs: angle_from_vertical(hip, knee),
        neck: angle_from_vertical(nose, shoulder),
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoachError;

    fn p(x: f64, y: f64) -> Landmark {
        Landmark::new(x, y)
    }

    #[test]
    fn test_straight_line_is_180() {
        let angle = angle_at_vertex(p(0.0, 0.0), p(0.5, 0.0), p(1.0, 0.0));
        assert!((angle - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_right_angle() {
        let angle = angle_at_vertex(p(0.0, 0.0), p(0.5, 0.0), p(0.5, 0.5));
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_folded_is_zero() {
        let angle = angle_at_vertex(p(1.0, 0.0), p(0.0, 0.0), p(2.0, 0.0));
        assert!(angle.abs() < 1e-9);
    }

    #[test]
    fn test_coincident_points_are_zero() {
        let q = p(0.3, 0.3);
        assert_eq!(angle_at_vertex(q, q, q), 0.0);
        assert_eq!(angle_at_vertex(q, q, p(0.9, 0.1)), 0.0);
        assert_eq!(angle_from_vertical(q, q), 0.0);
    }

    #[test]
    fn test_non_finite_is_zero() {
        let angle = angle_at_vertex(p(f64::NAN, 0.0), p(0.5, 0.0), p(1.0, 0.0));
        assert_eq!(angle, 0.0);
        assert_eq!(angle_from_vertical(p(f64::INFINITY, 0.0), p(0.0, 0.0)), 0.0);
    }

    #[test]
    fn test_vertical_reference() {
        // a directly "above" b in the (0, -1) direction
        assert!(angle_from_vertical(p(0.5, 0.2), p(0.5, 0.8)).abs() < 1e-9);
        // opposite direction
        assert!((angle_from_vertical(p(0.5, 0.8), p(0.5, 0.2)) - 180.0).abs() < 1e-9);
        // horizontal
        assert!((angle_from_vertical(p(0.9, 0.5), p(0.5, 0.5)) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_derive_requires_all_indices() {
        let frame = vec![p(0.5, 0.5); 27];
        let err = derive_angles(&frame).unwrap_err();
        assert!(matches!(err, CoachError::MissingLandmark { index: 28 }));
    }
}
