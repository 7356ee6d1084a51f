//! Rep-counting phase and persistent coach state

use serde::{Deserialize, Serialize};

/// Half-cycle of a repetition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Extended position, initial phase
    #[default]
    Up,
    /// Flexed position, waiting for the return to UP
    Down,
}

impl Phase {
    /// Lowercase name used on the wire ("up" / "down")
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Up => "up",
            Phase::Down => "down",
        }
    }

    /// Get emoji for phase
    pub fn emoji(&self) -> &'static str {
        match self {
            Phase::Up => "⬆️",
            Phase::Down => "⬇️",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Up => "UP",
            Phase::Down => "DOWN",
        };
        write!(f, "{}", name)
    }
}

/// The only state that outlives a frame: rep count and current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CoachState {
    pub reps: u32,
    pub phase: Phase,
}

impl CoachState {
    /// Session-start state: no reps, UP
    pub fn new() -> Self {
        Self::default()
    }
}
