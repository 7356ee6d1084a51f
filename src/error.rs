//! Error type for RepCoach
//!
//! The counter itself never returns these: frame problems are recovered
//! locally and reported through reason codes. They surface from the outer
//! layers (rule loading, frame parsing, I/O).

use thiserror::Error;

use crate::types::AngleKind;

#[derive(Error, Debug)]
pub enum CoachError {
    /// Required landmark index is absent from the frame
    #[error("landmark {index} missing from frame")]
    MissingLandmark { index: usize },

    /// Landmark has a NaN or infinite coordinate
    #[error("landmark {index} has non-finite coordinates")]
    NonFiniteLandmark { index: usize },

    #[error("unknown exercise '{0}'")]
    UnknownExercise(String),

    /// Rule set is malformed (empty side, bad threshold)
    #[error("invalid rule set for '{exercise}': {detail}")]
    InvalidRule { exercise: String, detail: String },

    /// DOWN and UP predicates could both hold for the same angle
    #[error("rule set for '{exercise}' has overlapping thresholds on {angle}")]
    OverlappingThresholds { exercise: String, angle: AngleKind },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoachError {
    /// Frame-level errors are skipped rather than propagated
    pub fn is_frame_error(&self) -> bool {
        matches!(
            self,
            CoachError::MissingLandmark { .. } | CoachError::NonFiniteLandmark { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CoachError>;
