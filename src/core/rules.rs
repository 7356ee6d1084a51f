//! Threshold rule sets keyed by exercise name
//!
//! Each row holds the DOWN and UP predicates for one exercise. A side holds
//! when every one of its conditions holds. Comparisons are strict.
//!
//! Built-in rows:
//! - squat:        DOWN knee < 95            | UP knee > 160
//! - squat-strict: DOWN knee < 90, hip < 100 | UP knee > 165, hip > 160
//! - pushup:       DOWN arm < 90             | UP arm > 160

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoachError, Result};
use crate::types::{AngleKind, AngleSet};
use crate::{
    PUSHUP_ARM_DOWN_BELOW, PUSHUP_ARM_UP_ABOVE, SQUAT_KNEE_DOWN_BELOW, SQUAT_KNEE_UP_ABOVE,
    STRICT_SQUAT_HIP_DOWN_BELOW, STRICT_SQUAT_HIP_UP_ABOVE, STRICT_SQUAT_KNEE_DOWN_BELOW,
    STRICT_SQUAT_KNEE_UP_ABOVE,
};

/// Strict threshold comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Below(f64),
    Above(f64),
}

impl Comparison {
    pub fn holds(&self, value: f64) -> bool {
        match *self {
            Comparison::Below(threshold) => value < threshold,
            Comparison::Above(threshold) => value > threshold,
        }
    }

    fn threshold(&self) -> f64 {
        match *self {
            Comparison::Below(t) | Comparison::Above(t) => t,
        }
    }
}

/// One angle compared against one threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub angle: AngleKind,
    pub op: Comparison,
}

impl Condition {
    pub fn below(angle: AngleKind, threshold: f64) -> Self {
        Self { angle, op: Comparison::Below(threshold) }
    }

    pub fn above(angle: AngleKind, threshold: f64) -> Self {
        Self { angle, op: Comparison::Above(threshold) }
    }

    pub fn holds(&self, angles: &AngleSet) -> bool {
        self.op.holds(angles.get(self.angle))
    }
}

/// DOWN / UP predicates for one exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub exercise: String,
    /// All must hold for UP → DOWN
    pub down: Vec<Condition>,
    /// All must hold for DOWN → UP
    pub up: Vec<Condition>,
}

impl RuleSet {
    pub fn new(exercise: &str, down: Vec<Condition>, up: Vec<Condition>) -> Self {
        Self {
            exercise: exercise.to_string(),
            down,
            up,
        }
    }

    pub fn down_holds(&self, angles: &AngleSet) -> bool {
        self.down.iter().all(|c| c.holds(angles))
    }

    pub fn up_holds(&self, angles: &AngleSet) -> bool {
        self.up.iter().all(|c| c.holds(angles))
    }

    /// Reject rows whose predicates are empty, unsatisfiable, or not disjoint.
    ///
    /// Every angle on either side must admit a non-empty range. Disjointness
    /// then needs at least one angle shared by both sides whose DOWN and UP
    /// ranges cannot overlap.
    pub fn validate(&self) -> Result<()> {
        let invalid = |detail: &str| CoachError::InvalidRule {
            exercise: self.exercise.clone(),
            detail: detail.to_string(),
        };

        if self.exercise.trim().is_empty() {
            return Err(invalid("exercise name is empty"));
        }
        if self.down.is_empty() || self.up.is_empty() {
            return Err(invalid("both down and up need at least one condition"));
        }
        if self
            .down
            .iter()
            .chain(self.up.iter())
            .any(|c| !c.op.threshold().is_finite())
        {
            return Err(invalid("thresholds must be finite"));
        }

        for kind in AngleKind::ALL {
            if matches!(range_for(&self.down, kind), Some((lo, hi)) if lo >= hi) {
                return Err(invalid("down condition can never hold"));
            }
            if matches!(range_for(&self.up, kind), Some((lo, hi)) if lo >= hi) {
                return Err(invalid("up condition can never hold"));
            }
        }

        let mut shared = None;
        for kind in AngleKind::ALL {
            if let (Some(down), Some(up)) = (range_for(&self.down, kind), range_for(&self.up, kind)) {
                // Open intervals: touching endpoints are still disjoint
                if down.1 <= up.0 || up.1 <= down.0 {
                    return Ok(());
                }
                shared.get_or_insert(kind);
            }
        }

        match shared {
            Some(angle) => Err(CoachError::OverlappingThresholds {
                exercise: self.exercise.clone(),
                angle,
            }),
            None => Err(invalid("down and up share no angle")),
        }
    }
}

/// Open interval admitted by the conditions on one angle, if any mention it
fn range_for(conditions: &[Condition], kind: AngleKind) -> Option<(f64, f64)> {
    let mut range: Option<(f64, f64)> = None;
    for c in conditions.iter().filter(|c| c.angle == kind) {
        let (lo, hi) = range.unwrap_or((f64::NEG_INFINITY, f64::INFINITY));
        range = Some(match c.op {
            Comparison::Below(t) => (lo, hi.min(t)),
            Comparison::Above(t) => (lo.max(t), hi),
        });
    }
    range
}

/// Rule sets keyed by exercise name (case-insensitive)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleTable {
    rules: Vec<RuleSet>,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            rules: vec![
                RuleSet::new(
                    "squat",
                    vec![Condition::below(AngleKind::Knee, SQUAT_KNEE_DOWN_BELOW)],
                    vec![Condition::above(AngleKind::Knee, SQUAT_KNEE_UP_ABOVE)],
                ),
                RuleSet::new(
                    "squat-strict",
                    vec![
                        Condition::below(AngleKind::Knee, STRICT_SQUAT_KNEE_DOWN_BELOW),
                        Condition::below(AngleKind::Hip, STRICT_SQUAT_HIP_DOWN_BELOW),
                    ],
                    vec![
                        Condition::above(AngleKind::Knee, STRICT_SQUAT_KNEE_UP_ABOVE),
                        Condition::above(AngleKind::Hip, STRICT_SQUAT_HIP_UP_ABOVE),
                    ],
                ),
                RuleSet::new(
                    "pushup",
                    vec![Condition::below(AngleKind::Arm, PUSHUP_ARM_DOWN_BELOW)],
                    vec![Condition::above(AngleKind::Arm, PUSHUP_ARM_UP_ABOVE)],
                ),
            ],
        }
    }
}

impl RuleTable {
    /// Empty table; every exercise is unsupported until rows are added
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Build a table from rows, validating each
    pub fn from_rules(rules: Vec<RuleSet>) -> Result<Self> {
        let mut table = Self::empty();
        for rule in rules {
            table.insert(rule)?;
        }
        Ok(table)
    }

    /// Add a row, replacing any row with the same name
    pub fn insert(&mut self, rule: RuleSet) -> Result<()> {
        rule.validate()?;
        let key = normalize(&rule.exercise);
        self.rules.retain(|r| normalize(&r.exercise) != key);
        self.rules.push(rule);
        Ok(())
    }

    pub fn get(&self, exercise: &str) -> Option<&RuleSet> {
        let key = normalize(exercise);
        self.rules.iter().find(|r| normalize(&r.exercise) == key)
    }

    /// Like [`RuleTable::get`], but unknown names are an error
    pub fn require(&self, exercise: &str) -> Result<&RuleSet> {
        self.get(exercise)
            .ok_or_else(|| CoachError::UnknownExercise(exercise.to_string()))
    }

    pub fn supports(&self, exercise: &str) -> bool {
        self.get(exercise).is_some()
    }

    pub fn exercises(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.exercise.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Parse a JSON array of rule sets
    pub fn from_json_str(json: &str) -> Result<Self> {
        let rules: Vec<RuleSet> = serde_json::from_str(json)?;
        Self::from_rules(rules)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn normalize(exercise: &str) -> String {
    exercise.trim().to_lowercase()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rows_validate() {
        let table = RuleTable::default();
        assert_eq!(table.exercises(), vec!["squat", "squat-strict", "pushup"]);
        for name in table.exercises() {
            table.get(name).unwrap().validate().unwrap();
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = RuleTable::default();
        assert!(table.supports("Squat"));
        assert!(table.supports(" PUSHUP "));
        assert!(!table.supports("plank"));
        assert!(matches!(
            table.require("plank"),
            Err(CoachError::UnknownExercise(name)) if name == "plank"
        ));
    }

    #[test]
    fn test_thresholds_are_strict() {
        let squat = RuleTable::default().get("squat").cloned().unwrap();
        assert!(!squat.down_holds(&AngleSet::joints(95.0, 170.0, 170.0)));
        assert!(squat.down_holds(&AngleSet::joints(94.9, 170.0, 170.0)));
        assert!(!squat.up_holds(&AngleSet::joints(160.0, 170.0, 170.0)));
        assert!(squat.up_holds(&AngleSet::joints(160.1, 170.0, 170.0)));
    }

    #[test]
    fn test_strict_squat_needs_hip() {
        let strict = RuleTable::default().get("squat-strict").cloned().unwrap();
        // Deep knee bend but torso still upright
        assert!(!strict.down_holds(&AngleSet::joints(80.0, 150.0, 170.0)));
        assert!(strict.down_holds(&AngleSet::joints(80.0, 90.0, 170.0)));
        // Knee straight but hip still folded
        assert!(!strict.up_holds(&AngleSet::joints(170.0, 120.0, 170.0)));
        assert!(strict.up_holds(&AngleSet::joints(170.0, 170.0, 170.0)));
    }

    #[test]
    fn test_overlapping_thresholds_rejected() {
        let rule = RuleSet::new(
            "lunge",
            vec![Condition::below(AngleKind::Knee, 120.0)],
            vec![Condition::above(AngleKind::Knee, 100.0)],
        );
        let err = rule.validate().unwrap_err();
        assert!(matches!(
            err,
            CoachError::OverlappingThresholds { angle: AngleKind::Knee, .. }
        ));
    }

    #[test]
    fn test_touching_thresholds_are_disjoint() {
        let rule = RuleSet::new(
            "curl",
            vec![Condition::below(AngleKind::Arm, 100.0)],
            vec![Condition::above(AngleKind::Arm, 100.0)],
        );
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn test_no_shared_angle_rejected() {
        let rule = RuleSet::new(
            "odd",
            vec![Condition::below(AngleKind::Knee, 90.0)],
            vec![Condition::above(AngleKind::Arm, 160.0)],
        );
        assert!(matches!(rule.validate(), Err(CoachError::InvalidRule { .. })));
    }

    #[test]
    fn test_impossible_range_after_disjoint_angle_rejected() {
        // Knee ranges are disjoint, but the hip range on the up side is empty
        let rule = RuleSet::new(
            "broken",
            vec![Condition::below(AngleKind::Knee, 90.0)],
            vec![
                Condition::above(AngleKind::Knee, 165.0),
                Condition::above(AngleKind::Hip, 170.0),
                Condition::below(AngleKind::Hip, 100.0),
            ],
        );
        match rule.validate() {
            Err(CoachError::InvalidRule { detail, .. }) => {
                assert_eq!(detail, "up condition can never hold");
            }
            other => panic!("expected InvalidRule, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_side_rejected() {
        let rule = RuleSet::new("empty", vec![], vec![Condition::above(AngleKind::Arm, 160.0)]);
        assert!(matches!(rule.validate(), Err(CoachError::InvalidRule { .. })));
    }

    #[test]
    fn test_insert_replaces_same_name() {
        let mut table = RuleTable::default();
        table
            .insert(RuleSet::new(
                "SQUAT",
                vec![Condition::below(AngleKind::Knee, 80.0)],
                vec![Condition::above(AngleKind::Knee, 170.0)],
            ))
            .unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.get("squat").unwrap().down,
            vec![Condition::below(AngleKind::Knee, 80.0)]
        );
    }

    #[test]
    fn test_json_shape() {
        let json = r#"[
            {
                "exercise": "curl",
                "down": [{"angle": "arm", "op": {"below": 60.0}}],
                "up": [{"angle": "arm", "op": {"above": 150.0}}]
            }
        ]"#;
        let table = RuleTable::from_json_str(json).unwrap();
        assert!(table.supports("curl"));

        let dumped = table.to_json_pretty().unwrap();
        assert_eq!(RuleTable::from_json_str(&dumped).unwrap(), table);
    }

    #[test]
    fn test_json_with_bad_row_rejected() {
        let json = r#"[
            {
                "exercise": "bad",
                "down": [{"angle": "knee", "op": {"below": 150.0}}],
                "up": [{"angle": "knee", "op": {"above": 100.0}}]
            }
        ]"#;
        assert!(RuleTable::from_json_str(json).is_err());
    }
}
