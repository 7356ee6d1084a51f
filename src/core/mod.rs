//! Core modules for RepCoach

pub mod angle;
pub mod rules;
pub mod counter;
pub mod voice;
pub mod session;
pub mod replay;
pub mod api;

pub use angle::{angle_at_vertex, angle_from_vertical, derive_angles};
pub use rules::{Comparison, Condition, RuleSet, RuleTable};
pub use counter::RepCounter;
pub use voice::VoiceIntent;
pub use session::{Cue, FrameReport, SessionCommand, WorkoutSession};
pub use replay::{replay, ReplayOptions};
pub use api::{create_router, run_server};
