//! Voice intents: transcribed speech → session commands
//!
//! Keyword matching on lowercase transcripts, first match wins:
//! Encourage, then Stop, then Reset.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::session::SessionCommand;

lazy_static! {
    static ref RE_ENCOURAGE: Regex = Regex::new(
        r"(?i)(\bi can'?t do (any )?more\b|\btoo tired\b)"
    ).unwrap();

    static ref RE_STOP: Regex = Regex::new(
        r"(?i)(\bnot possible\b|\bstop (the )?workout\b)"
    ).unwrap();

    static ref RE_RESET: Regex = Regex::new(r"(?i)\breset\b").unwrap();
}

/// What the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceIntent {
    /// "too tired", "I can't do more"
    Encourage,
    /// "not possible", "stop workout"
    Stop,
    Reset,
    /// Nothing recognized
    None,
}

impl VoiceIntent {
    /// Resolve a transcript to an intent
    pub fn resolve(transcript: &str) -> Self {
        let text = transcript.trim();
        if RE_ENCOURAGE.is_match(text) {
            VoiceIntent::Encourage
        } else if RE_STOP.is_match(text) {
            VoiceIntent::Stop
        } else if RE_RESET.is_match(text) {
            VoiceIntent::Reset
        } else {
            VoiceIntent::None
        }
    }

    /// Command to hand to the session, if any
    pub fn command(&self) -> Option<SessionCommand> {
        match self {
            VoiceIntent::Encourage => Some(SessionCommand::Encourage),
            VoiceIntent::Stop => Some(SessionCommand::Stop),
            VoiceIntent::Reset => Some(SessionCommand::Reset),
            VoiceIntent::None => None,
        }
    }
}
