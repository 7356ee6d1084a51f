//! Core types for RepCoach

mod angles;
mod landmark;
mod output;
mod reason;
mod state;

pub use angles::{AngleKind, AngleSet};
pub use landmark::{Landmark, PoseLandmark};
pub use output::EvaluationOutput;
pub use reason::ReasonCode;
pub use state::{CoachState, Phase};
