//! Integration tests for workout sessions
//!
//! Tests frames, voice transcripts and commands flowing through one
//! WorkoutSession, the way a camera + speech front end would drive it.

use pretty_assertions::assert_eq;
use repcoach::core::{Cue, RuleTable, SessionCommand, VoiceIntent, WorkoutSession};
use repcoach::types::{Landmark, Phase, PoseLandmark};

fn squat(knee_angle: f64) -> Vec<Landmark> {
    let mut frame = vec![Landmark::new(0.5, 0.5); 33];
    let rad = knee_angle.to_radians();
    frame[PoseLandmark::Nose.index()] = Landmark::new(0.5, 0.15);
    frame[PoseLandmark::Shoulder.index()] = Landmark::new(0.5, 0.3);
    frame[PoseLandmark::Elbow.index()] = Landmark::new(0.5, 0.45);
    frame[PoseLandmark::Wrist.index()] = Landmark::new(0.5, 0.6);
    frame[PoseLandmark::Hip.index()] = Landmark::new(0.5, 0.55);
    frame[PoseLandmark::Knee.index()] = Landmark::new(0.5, 0.75);
    frame[PoseLandmark::Ankle.index()] =
        Landmark::new(0.5 + 0.2 * rad.sin(), 0.75 - 0.2 * rad.cos());
    frame
}

fn started(exercise: &str) -> WorkoutSession {
    let mut session = WorkoutSession::new(exercise, RuleTable::default());
    let cues = session.start();
    assert_eq!(cues, vec![Cue::say("Let's get to work!")]);
    session
}

fn do_squat(session: &mut WorkoutSession) -> Vec<Cue> {
    let mut cues = Vec::new();
    for knee in [170.0, 80.0, 170.0] {
        let report = session.handle_frame(&squat(knee)).unwrap();
        cues.extend(report.cues);
    }
    cues
}

#[test]
fn test_rep_number_is_spoken() {
    let mut session = started("squat");

    assert_eq!(do_squat(&mut session), vec![Cue::say("1")]);
    assert_eq!(do_squat(&mut session), vec![Cue::say("2")]);
    assert_eq!(session.reps(), 2);
}

#[test]
fn test_voice_reset() {
    let mut session = started("squat");
    do_squat(&mut session);
    session.handle_frame(&squat(80.0));
    assert_eq!(session.phase(), Phase::Down);

    let (intent, cues) = session.hear("Reset please");
    assert_eq!(intent, VoiceIntent::Reset);
    assert_eq!(cues, vec![Cue::say("Counter reset to zero.")]);
    assert_eq!(session.reps(), 0);
    assert_eq!(session.phase(), Phase::Up);
    assert!(session.is_active());
}

#[test]
fn test_voice_stop_ends_session() {
    let mut session = started("squat");
    do_squat(&mut session);
    do_squat(&mut session);

    let (intent, cues) = session.hear("this is not possible");
    assert_eq!(intent, VoiceIntent::Stop);
    assert_eq!(
        cues,
        vec![Cue::say("Alright, don't hurt yourself. You've already done 2 reps!")]
    );
    assert!(!session.is_active());
    assert!(session.handle_frame(&squat(80.0)).is_none());
    assert_eq!(session.reps(), 2);
}

#[test]
fn test_voice_encourage_keeps_counting() {
    let mut session = started("squat");
    let (intent, cues) = session.hear("I'm too tired");
    assert_eq!(intent, VoiceIntent::Encourage);
    assert_eq!(cues, vec![Cue::say("Just try for a few more, you can do it!")]);
    assert!(session.is_active());
    assert_eq!(do_squat(&mut session), vec![Cue::say("1")]);
}

#[test]
fn test_restart_clears_count() {
    let mut session = started("squat");
    do_squat(&mut session);
    session.apply(SessionCommand::Stop);

    session.apply(SessionCommand::Start);
    assert!(session.is_active());
    assert_eq!(session.reps(), 0);
}

#[test]
fn test_switching_exercise() {
    let mut session = started("plank");
    assert!(!session.supports_exercise("plank"));
    assert!(do_squat(&mut session).is_empty());
    assert_eq!(session.reps(), 0);

    session.set_exercise("squat");
    assert_eq!(session.exercise(), "squat");
    assert_eq!(do_squat(&mut session), vec![Cue::say("1")]);
}

#[test]
fn test_sessions_are_independent() {
    let mut a = started("squat");
    let mut b = started("squat");

    do_squat(&mut a);
    do_squat(&mut a);
    do_squat(&mut b);

    assert_eq!(a.reps(), 2);
    assert_eq!(b.reps(), 1);
}
