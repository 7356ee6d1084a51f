//! Result record handed to the presentation layer after each frame

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::types::{AngleSet, Phase, ReasonCode};

/// Output of one evaluation cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationOutput {
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Exercise selector used for this frame
    pub exercise: String,
    /// Angles for this frame; `None` when the frame was skipped
    pub angles: Option<AngleSet>,
    /// Cumulative reps
    pub reps: u32,
    /// Current phase
    pub phase: Phase,
    /// True only on the evaluation that counted a rep
    pub rep_completed: bool,
    /// Reason for current state
    pub reason: ReasonCode,
}

impl EvaluationOutput {
    /// Create new output
    pub fn new(
        exercise: &str,
        angles: Option<AngleSet>,
        reps: u32,
        phase: Phase,
        reason: ReasonCode,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            exercise: exercise.to_string(),
            angles,
            reps,
            phase,
            rep_completed: reason == ReasonCode::E002_REP_COMPLETED,
            reason,
        }
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let phase = match self.phase {
            Phase::Down => self.phase.to_string().yellow().bold(),
            Phase::Up => self.phase.to_string().green().bold(),
        };
        let reason = if self.reason.is_skip() {
            self.reason.code().red()
        } else {
            self.reason.code().dimmed()
        };

        format!(
            "{} reps={} | phase={} | {} | {}",
            self.phase.emoji(),
            self.reps.to_string().bold(),
            phase,
            self.angles_string(),
            reason
        )
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "reps={} | phase={} | {} | reason={}",
            self.reps,
            self.phase,
            self.angles_string(),
            self.reason.code()
        )
    }

    /// Angles rounded to whole degrees for display
    fn angles_string(&self) -> String {
        match &self.angles {
            Some(angles) => angles
                .iter()
                .map(|(kind, value)| format!("{}={:.0}°", kind, value))
                .collect::<Vec<_>>()
                .join(" "),
            None => "angles=-".to_string(),
        }
    }
}
