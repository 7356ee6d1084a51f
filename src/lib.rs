//! RepCoach: joint-angle rep counting over pose landmark streams
//!
//! Landmarks → AngleSet → RepCounter → session cues / terminal / HTTP

pub mod core;
pub mod error;
pub mod logging;
pub mod types;

pub use error::{CoachError, Result};

// =============================================================================
// SQUAT THRESHOLDS (degrees)
// =============================================================================

/// Knee angle below which a squat enters DOWN
pub const SQUAT_KNEE_DOWN_BELOW: f64 = 95.0;

/// Knee angle above which a squat returns UP (rep counted)
pub const SQUAT_KNEE_UP_ABOVE: f64 = 160.0;

// =============================================================================
// STRICT SQUAT THRESHOLDS (degrees) - knee gated by hip
// =============================================================================

pub const STRICT_SQUAT_KNEE_DOWN_BELOW: f64 = 90.0;
pub const STRICT_SQUAT_HIP_DOWN_BELOW: f64 = 100.0;
pub const STRICT_SQUAT_KNEE_UP_ABOVE: f64 = 165.0;
pub const STRICT_SQUAT_HIP_UP_ABOVE: f64 = 160.0;

// =============================================================================
// PUSH-UP THRESHOLDS (degrees)
// =============================================================================

/// Elbow angle below which a push-up enters DOWN
pub const PUSHUP_ARM_DOWN_BELOW: f64 = 90.0;

/// Elbow angle above which a push-up returns UP (rep counted)
pub const PUSHUP_ARM_UP_ABOVE: f64 = 160.0;

// =============================================================================
// SESSION DEFAULTS
// =============================================================================

/// Exercise selected when none is given
pub const DEFAULT_EXERCISE: &str = "squat";

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
