//! Rep Counter: two-phase state machine over joint angles
//!
//! State transitions (thresholds come from the exercise's rule set):
//! - UP → DOWN: every DOWN condition holds
//! - DOWN → UP: every UP condition holds, reps += 1
//!
//! At most one transition per evaluation. Skipped frames and unsupported
//! exercises leave the state untouched.

use crate::core::angle::derive_angles;
use crate::core::rules::{RuleSet, RuleTable};
use crate::error::CoachError;
use crate::types::{AngleSet, CoachState, EvaluationOutput, Landmark, Phase, ReasonCode};

/// Owns the [`CoachState`]; nothing else writes it
#[derive(Debug, Clone)]
pub struct RepCounter {
    state: CoachState,
    rules: RuleTable,
    /// Frames that reached the rule logic
    frames_evaluated: u64,
    /// Frames dropped for missing/invalid landmarks
    frames_skipped: u64,
}

impl Default for RepCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl RepCounter {
    /// Counter with the built-in rule table
    pub fn new() -> Self {
        Self::with_rules(RuleTable::default())
    }

    pub fn with_rules(rules: RuleTable) -> Self {
        Self {
            state: CoachState::new(),
            rules,
            frames_evaluated: 0,
            frames_skipped: 0,
        }
    }

    /// Evaluate one frame of landmarks
    pub fn evaluate(&mut self, landmarks: &[Landmark], exercise: &str) -> EvaluationOutput {
        match derive_angles(landmarks) {
            Ok(angles) => self.evaluate_angles(&angles, exercise),
            Err(err) => {
                let reason = match err {
                    CoachError::MissingLandmark { .. } => ReasonCode::E003_FRAME_MISSING_LANDMARK,
                    _ => ReasonCode::E003_FRAME_NON_FINITE,
                };
                self.skip(exercise, reason)
            }
        }
    }

    /// Evaluate an already derived angle set
    pub fn evaluate_angles(&mut self, angles: &AngleSet, exercise: &str) -> EvaluationOutput {
        if !angles.is_finite() {
            return self.skip(exercise, ReasonCode::E003_FRAME_NON_FINITE);
        }

        let Some(rule) = self.rules.get(exercise) else {
            return self.output(exercise, Some(*angles), ReasonCode::E004_EXERCISE_UNSUPPORTED);
        };

        let (new_phase, reason) = compute_transition(self.state.phase, rule, angles);
        self.frames_evaluated += 1;

        if new_phase != self.state.phase {
            self.state.phase = new_phase;
            if reason == ReasonCode::E002_REP_COMPLETED {
                self.state.reps = self.state.reps.saturating_add(1);
            }
        }

        self.output(exercise, Some(*angles), reason)
    }

    fn skip(&mut self, exercise: &str, reason: ReasonCode) -> EvaluationOutput {
        self.frames_skipped += 1;
        self.output(exercise, None, reason)
    }

    fn output(&self, exercise: &str, angles: Option<AngleSet>, reason: ReasonCode) -> EvaluationOutput {
        EvaluationOutput::new(exercise, angles, self.state.reps, self.state.phase, reason)
    }

    /// Back to `{reps: 0, phase: up}`; rule table is kept
    pub fn reset(&mut self) {
        self.state = CoachState::new();
    }

    /// Get current state
    pub fn state(&self) -> CoachState {
        self.state
    }

    pub fn reps(&self) -> u32 {
        self.state.reps
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn frames_evaluated(&self) -> u64 {
        self.frames_evaluated
    }

    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }
}

/// Next phase for `phase` under `rule`
fn compute_transition(phase: Phase, rule: &RuleSet, angles: &AngleSet) -> (Phase, ReasonCode) {
    match phase {
        Phase::Up => {
            if rule.down_holds(angles) {
                (Phase::Down, ReasonCode::E002_TRANSITION_TO_DOWN)
            } else {
                (Phase::Up, ReasonCode::E001_HOLDING_UP)
            }
        }
        Phase::Down => {
            if rule.up_holds(angles) {
                (Phase::Up, ReasonCode::E002_REP_COMPLETED)
            } else {
                (Phase::Down, ReasonCode::E001_HOLDING_DOWN)
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn knee(value: f64) -> AngleSet {
        AngleSet::joints(value, 170.0, 170.0)
    }

    fn arm(value: f64) -> AngleSet {
        AngleSet::joints(170.0, 170.0, value)
    }

    #[test]
    fn test_initial_state_is_up() {
        let counter = RepCounter::new();
        assert_eq!(counter.state(), CoachState { reps: 0, phase: Phase::Up });
    }

    #[test]
    fn test_squat_down_then_up_counts_one() {
        let mut counter = RepCounter::new();
        counter.evaluate_angles(&knee(170.0), "squat");

        let output = counter.evaluate_angles(&knee(80.0), "squat");
        assert_eq!(output.phase, Phase::Down);
        assert_eq!(output.reason, ReasonCode::E002_TRANSITION_TO_DOWN);
        assert!(!output.rep_completed);

        let output = counter.evaluate_angles(&knee(170.0), "squat");
        assert_eq!(output.phase, Phase::Up);
        assert_eq!(output.reps, 1);
        assert!(output.rep_completed);
    }

    #[test]
    fn test_partial_rise_stays_down() {
        let mut counter = RepCounter::new();
        for value in [170.0, 80.0, 120.0] {
            counter.evaluate_angles(&knee(value), "squat");
        }
        assert_eq!(counter.reps(), 0);
        assert_eq!(counter.phase(), Phase::Down);
    }

    #[test]
    fn test_repeated_frames_are_idempotent() {
        let mut counter = RepCounter::new();
        counter.evaluate_angles(&knee(80.0), "squat");
        for _ in 0..10 {
            let output = counter.evaluate_angles(&knee(80.0), "squat");
            assert_eq!(output.reason, ReasonCode::E001_HOLDING_DOWN);
        }
        counter.evaluate_angles(&knee(170.0), "squat");
        for _ in 0..10 {
            let output = counter.evaluate_angles(&knee(170.0), "squat");
            assert!(!output.rep_completed);
        }
        assert_eq!(counter.reps(), 1);
        assert_eq!(counter.phase(), Phase::Up);
    }

    #[test]
    fn test_pushup_uses_arm() {
        let mut counter = RepCounter::new();
        // Knee bends do nothing for push-ups
        counter.evaluate_angles(&knee(60.0), "pushup");
        assert_eq!(counter.phase(), Phase::Up);

        for value in [170.0, 70.0, 170.0] {
            counter.evaluate_angles(&arm(value), "pushup");
        }
        assert_eq!(counter.reps(), 1);
    }

    #[test]
    fn test_unsupported_exercise_is_noop() {
        let mut counter = RepCounter::new();
        for value in [170.0, 10.0, 179.0, 0.0] {
            let output = counter.evaluate_angles(&AngleSet::joints(value, value, value), "plank");
            assert_eq!(output.reason, ReasonCode::E004_EXERCISE_UNSUPPORTED);
            assert!(output.angles.is_some());
        }
        assert_eq!(counter.state(), CoachState::new());
        assert_eq!(counter.frames_evaluated(), 0);
    }

    #[test]
    fn test_non_finite_angles_skipped() {
        let mut counter = RepCounter::new();
        counter.evaluate_angles(&knee(80.0), "squat");
        let output = counter.evaluate_angles(&knee(f64::NAN), "squat");
        assert_eq!(output.reason, ReasonCode::E003_FRAME_NON_FINITE);
        assert_eq!(output.phase, Phase::Down);
        assert!(output.angles.is_none());
        assert_eq!(counter.frames_skipped(), 1);
    }

    #[test]
    fn test_short_frame_skipped() {
        let mut counter = RepCounter::new();
        let output = counter.evaluate(&[Landmark::new(0.5, 0.5); 10], "squat");
        assert_eq!(output.reason, ReasonCode::E003_FRAME_MISSING_LANDMARK);
        assert_eq!(counter.state(), CoachState::new());
    }

    #[test]
    fn test_rep_count_saturates() {
        let mut counter = RepCounter::new();
        counter.state = CoachState { reps: u32::MAX, phase: Phase::Down };

        let output = counter.evaluate_angles(&knee(170.0), "squat");
        assert!(output.rep_completed);
        assert_eq!(output.reps, u32::MAX);
        assert_eq!(counter.phase(), Phase::Up);
    }

    #[test]
    fn test_reset() {
        let mut counter = RepCounter::new();
        for value in [80.0, 170.0, 80.0] {
            counter.evaluate_angles(&knee(value), "squat");
        }
        assert_eq!(counter.reps(), 1);
        assert_eq!(counter.phase(), Phase::Down);

        counter.reset();
        assert_eq!(counter.state(), CoachState { reps: 0, phase: Phase::Up });
    }
}
