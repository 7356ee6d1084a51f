//! Reason codes attached to every evaluation

use serde::{Deserialize, Serialize};

/// Why an evaluation produced the state it did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ReasonCode {
    // =========================================================================
    // E001: No transition
    // =========================================================================
    /// Phase is UP, DOWN condition not met
    E001_HOLDING_UP,
    /// Phase is DOWN, UP condition not met
    E001_HOLDING_DOWN,

    // =========================================================================
    // E002: Transitions
    // =========================================================================
    /// UP → DOWN
    E002_TRANSITION_TO_DOWN,
    /// DOWN → UP, rep counted
    E002_REP_COMPLETED,

    // =========================================================================
    // E003: Skipped frames
    // =========================================================================
    /// A required landmark index was absent
    E003_FRAME_MISSING_LANDMARK,
    /// A landmark or derived angle was NaN/infinite
    E003_FRAME_NON_FINITE,

    // =========================================================================
    // E004: Selector
    // =========================================================================
    /// No rule set for the selected exercise
    E004_EXERCISE_UNSUPPORTED,
}

impl ReasonCode {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::E001_HOLDING_UP => "E001_HOLDING_UP",
            Self::E001_HOLDING_DOWN => "E001_HOLDING_DOWN",
            Self::E002_TRANSITION_TO_DOWN => "E002_TRANSITION_TO_DOWN",
            Self::E002_REP_COMPLETED => "E002_REP_COMPLETED",
            Self::E003_FRAME_MISSING_LANDMARK => "E003_FRAME_MISSING_LANDMARK",
            Self::E003_FRAME_NON_FINITE => "E003_FRAME_NON_FINITE",
            Self::E004_EXERCISE_UNSUPPORTED => "E004_EXERCISE_UNSUPPORTED",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::E001_HOLDING_UP => "Holding UP",
            Self::E001_HOLDING_DOWN => "Holding DOWN",
            Self::E002_TRANSITION_TO_DOWN => "Entering DOWN",
            Self::E002_REP_COMPLETED => "Back UP - rep counted",
            Self::E003_FRAME_MISSING_LANDMARK => "Frame skipped - landmark missing",
            Self::E003_FRAME_NON_FINITE => "Frame skipped - invalid coordinates",
            Self::E004_EXERCISE_UNSUPPORTED => "Exercise not supported",
        }
    }

    /// Did the phase change?
    pub fn is_transition(&self) -> bool {
        matches!(self, Self::E002_TRANSITION_TO_DOWN | Self::E002_REP_COMPLETED)
    }

    /// Did this evaluation skip the transition logic?
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            Self::E003_FRAME_MISSING_LANDMARK | Self::E003_FRAME_NON_FINITE
        )
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
