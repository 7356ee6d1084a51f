//! JSON Lines replay: frames and voice lines through one session
//!
//! Each input line is one of:
//! - an array of landmarks
//! - `{"landmarks": [...]}`
//! - `{"say": "..."}` (voice transcript)
//!
//! Blank lines and `#` comments are ignored, `quit` ends the run, and a
//! voice stop ends it at the next frame.

use colored::Colorize;
use log::warn;
use serde::Deserialize;
use std::io::{BufRead, Write};

use crate::core::rules::RuleTable;
use crate::core::session::{Cue, WorkoutSession};
use crate::types::{EvaluationOutput, Landmark};
use crate::{Result, DEFAULT_EXERCISE, VERSION};

/// One line of frame input
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InputLine {
    Voice { say: String },
    Wrapped { landmarks: Vec<Landmark> },
    Frame(Vec<Landmark>),
}

/// How a replay renders its output
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    pub exercise: String,
    /// One JSON object per output line
    pub json: bool,
    pub no_color: bool,
    /// Print every frame, not only phase changes
    pub verbose: bool,
    /// Print the stdin prompt
    pub interactive: bool,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            exercise: DEFAULT_EXERCISE.to_string(),
            json: false,
            no_color: false,
            verbose: false,
            interactive: false,
        }
    }
}

/// Run every line of `reader` through a fresh session, writing to `out`.
///
/// Returns the session so callers can inspect the final count.
pub fn replay<R: BufRead, W: Write>(
    reader: R,
    out: &mut W,
    options: &ReplayOptions,
    rules: RuleTable,
) -> Result<WorkoutSession> {
    let mut session = WorkoutSession::new(&options.exercise, rules);

    if !options.json {
        write_header(out, options)?;
        if options.interactive {
            writeln!(out, "Paste one JSON frame per line, {{\"say\": \"...\"}} to talk. Type 'quit' to exit.")?;
            writeln!(out)?;
        }
    }
    write_cues(out, &session.start(), options)?;

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line == "quit" {
            break;
        }

        let input: InputLine = match serde_json::from_str(line) {
            Ok(input) => input,
            Err(e) => {
                warn!("line {}: not a frame ({})", number + 1, e);
                continue;
            }
        };

        match input {
            InputLine::Voice { say } => {
                let (_, cues) = session.hear(&say);
                write_cues(out, &cues, options)?;
            }
            InputLine::Wrapped { landmarks } | InputLine::Frame(landmarks) => {
                let Some(report) = session.handle_frame(&landmarks) else {
                    // Stopped by voice command
                    break;
                };
                if options.verbose || options.json || report.output.reason.is_transition() {
                    write_output(out, &report.output, options)?;
                }
                write_cues(out, &report.cues, options)?;
            }
        }
    }

    write_summary(out, &session, options)?;
    Ok(session)
}

fn write_header<W: Write>(out: &mut W, options: &ReplayOptions) -> Result<()> {
    let title = format!("RepCoach v{} - {}", VERSION, options.exercise);
    if options.no_color {
        writeln!(out, "{}", title)?;
    } else {
        writeln!(out, "{}", title.bold())?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_output<W: Write>(out: &mut W, output: &EvaluationOutput, options: &ReplayOptions) -> Result<()> {
    if options.json {
        writeln!(out, "{}", serde_json::to_string(output)?)?;
    } else if options.no_color {
        writeln!(out, "{}", output.to_parseable_string())?;
    } else {
        writeln!(out, "{}", output.to_terminal_string())?;
    }
    Ok(())
}

fn write_cues<W: Write>(out: &mut W, cues: &[Cue], options: &ReplayOptions) -> Result<()> {
    for cue in cues {
        if options.json {
            writeln!(out, "{}", serde_json::json!({ "say": cue.text }))?;
        } else if options.no_color {
            writeln!(out, "  say: {}", cue.text)?;
        } else {
            writeln!(out, "  🔊 {}", cue.text.cyan())?;
        }
    }
    Ok(())
}

fn write_summary<W: Write>(out: &mut W, session: &WorkoutSession, options: &ReplayOptions) -> Result<()> {
    let counter = session.counter();
    if options.json {
        let summary = serde_json::json!({
            "exercise": session.exercise(),
            "reps": counter.reps(),
            "frames_evaluated": counter.frames_evaluated(),
            "frames_skipped": counter.frames_skipped(),
        });
        writeln!(out, "{}", summary)?;
        return Ok(());
    }

    writeln!(out)?;
    let reps = format!("{} reps", counter.reps());
    if options.no_color {
        writeln!(out, "Total: {}", reps)?;
    } else {
        writeln!(out, "Total: {}", reps.green().bold())?;
    }
    writeln!(
        out,
        "Frames: {} evaluated, {} skipped",
        counter.frames_evaluated(),
        counter.frames_skipped()
    )?;
    Ok(())
}
