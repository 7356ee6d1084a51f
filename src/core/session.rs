//! Workout session: one user's counter, exercise selector and spoken cues
//!
//! Frames and commands go in by direct method call; cues come back as
//! plain text for whatever speech layer sits outside.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::core::counter::RepCounter;
use crate::core::rules::RuleTable;
use crate::core::voice::VoiceIntent;
use crate::types::{EvaluationOutput, Landmark, Phase, ReasonCode};
use crate::DEFAULT_EXERCISE;

/// Requests from UI buttons or resolved voice intents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionCommand {
    Start,
    Stop,
    Reset,
    Encourage,
}

/// Something to say to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cue {
    pub text: String,
}

impl Cue {
    pub fn say(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Result of feeding one frame to an active session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameReport {
    pub output: EvaluationOutput,
    pub cues: Vec<Cue>,
}

#[derive(Debug, Clone)]
pub struct WorkoutSession {
    counter: RepCounter,
    exercise: String,
    active: bool,
}

impl Default for WorkoutSession {
    fn default() -> Self {
        Self::new(DEFAULT_EXERCISE, RuleTable::default())
    }
}

impl WorkoutSession {
    /// New, not yet started session
    pub fn new(exercise: &str, rules: RuleTable) -> Self {
        Self {
            counter: RepCounter::with_rules(rules),
            exercise: exercise.to_string(),
            active: false,
        }
    }

    /// Reset the counter and begin accepting frames
    pub fn start(&mut self) -> Vec<Cue> {
        self.apply(SessionCommand::Start)
    }

    /// Feed one frame; `None` while the session is stopped
    pub fn handle_frame(&mut self, landmarks: &[Landmark]) -> Option<FrameReport> {
        if !self.active {
            return None;
        }

        let before = self.counter.phase();
        let output = self.counter.evaluate(landmarks, &self.exercise);
        let mut cues = Vec::new();

        if output.rep_completed {
            info!("{}: rep {} completed", self.exercise, output.reps);
            cues.push(Cue::say(output.reps.to_string()));
        } else if output.phase != before {
            debug!("{}: {} → {}", self.exercise, before, output.phase);
        } else if output.reason.is_skip() {
            debug!("{}: frame skipped ({})", self.exercise, output.reason.code());
        }

        Some(FrameReport { output, cues })
    }

    /// Apply a command, returning what to say
    pub fn apply(&mut self, command: SessionCommand) -> Vec<Cue> {
        info!("session command: {:?}", command);
        match command {
            SessionCommand::Start => {
                self.counter.reset();
                self.active = true;
                vec![Cue::say("Let's get to work!")]
            }
            SessionCommand::Stop => {
                self.active = false;
                vec![Cue::say(format!(
                    "Alright, don't hurt yourself. You've already done {} reps!",
                    self.counter.reps()
                ))]
            }
            SessionCommand::Reset => {
                self.counter.reset();
                vec![Cue::say("Counter reset to zero.")]
            }
            SessionCommand::Encourage => {
                vec![Cue::say("Just try for a few more, you can do it!")]
            }
        }
    }

    /// Resolve a transcript and apply its command
    pub fn hear(&mut self, transcript: &str) -> (VoiceIntent, Vec<Cue>) {
        let intent = VoiceIntent::resolve(transcript);
        debug!("heard {:?} → {:?}", transcript, intent);
        let cues = intent.command().map(|c| self.apply(c)).unwrap_or_default();
        (intent, cues)
    }

    /// Switch exercise; counter state carries over
    pub fn set_exercise(&mut self, exercise: &str) {
        info!("exercise: {} → {}", self.exercise, exercise);
        self.exercise = exercise.to_string();
    }

    pub fn exercise(&self) -> &str {
        &self.exercise
    }

    pub fn supports_exercise(&self, exercise: &str) -> bool {
        self.counter.rules().supports(exercise)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn reps(&self) -> u32 {
        self.counter.reps()
    }

    pub fn phase(&self) -> Phase {
        self.counter.phase()
    }

    pub fn counter(&self) -> &RepCounter {
        &self.counter
    }

    /// Reason code describing the current phase without a new frame
    pub fn holding_reason(&self) -> ReasonCode {
        match self.counter.phase() {
            Phase::Up => ReasonCode::E001_HOLDING_UP,
            Phase::Down => ReasonCode::E001_HOLDING_DOWN,
        }
    }
}
