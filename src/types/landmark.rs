//! Pose landmarks as delivered by the external detector

use serde::{Deserialize, Serialize};

use crate::error::{CoachError, Result};

/// A detected keypoint in normalized image coordinates.
///
/// Detectors usually send `z` and `visibility` as well; serde ignores them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Landmark indices the angle engine reads (33-point body topology)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoseLandmark {
    Nose = 0,
    Shoulder = 12,
    Elbow = 14,
    Wrist = 16,
    Hip = 24,
    Knee = 26,
    Ankle = 28,
}

impl PoseLandmark {
    /// Every index a frame must carry
    pub const REQUIRED: [PoseLandmark; 7] = [
        PoseLandmark::Nose,
        PoseLandmark::Shoulder,
        PoseLandmark::Elbow,
        PoseLandmark::Wrist,
        PoseLandmark::Hip,
        PoseLandmark::Knee,
        PoseLandmark::Ankle,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            PoseLandmark::Nose => "nose",
            PoseLandmark::Shoulder => "shoulder",
            PoseLandmark::Elbow => "elbow",
            PoseLandmark::Wrist => "wrist",
            PoseLandmark::Hip => "hip",
            PoseLandmark::Knee => "knee",
            PoseLandmark::Ankle => "ankle",
        }
    }

    /// Fetch this landmark from a frame, rejecting absent or non-finite points
    pub fn from_frame(self, landmarks: &[Landmark]) -> Result<Landmark> {
        let index = self.index();
        let point = landmarks
            .get(index)
            .copied()
            .ok_or(CoachError::MissingLandmark { index })?;
        if !point.is_finite() {
            return Err(CoachError::NonFiniteLandmark { index });
        }
        Ok(point)
    }
}
