//! Named joint angles derived from one frame

use serde::{Deserialize, Serialize};

/// Names of the angles in an [`AngleSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleKind {
    /// hip → knee → ankle
    Knee,
    /// shoulder → hip → knee
    Hip,
    /// shoulder → elbow → wrist
    Arm,
    /// ankle → knee against vertical
    Leg,
    /// hip → shoulder against vertical
    Chest,
    /// knee → hip against vertical
    Abs,
    /// shoulder → nose against vertical
    Neck,
}

impl AngleKind {
    pub const ALL: [AngleKind; 7] = [
        AngleKind::Knee,
        AngleKind::Hip,
        AngleKind::Arm,
        AngleKind::Leg,
        AngleKind::Chest,
        AngleKind::Abs,
        AngleKind::Neck,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AngleKind::Knee => "knee",
            AngleKind::Hip => "hip",
            AngleKind::Arm => "arm",
            AngleKind::Leg => "leg",
            AngleKind::Chest => "chest",
            AngleKind::Abs => "abs",
            AngleKind::Neck => "neck",
        }
    }
}

impl std::fmt::Display for AngleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Joint angles in degrees, [0, 180]. Not rounded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AngleSet {
    pub knee: f64,
    pub hip: f64,
    pub arm: f64,
    pub leg: f64,
    pub chest: f64,
    pub abs: f64,
    pub neck: f64,
}

impl AngleSet {
    /// Look up one angle by name
    pub fn get(&self, kind: AngleKind) -> f64 {
        match kind {
            AngleKind::Knee => self.knee,
            AngleKind::Hip => self.hip,
            AngleKind::Arm => self.arm,
            AngleKind::Leg => self.leg,
            AngleKind::Chest => self.chest,
            AngleKind::Abs => self.abs,
            AngleKind::Neck => self.neck,
        }
    }

    /// All angles with their names, in display order
    pub fn iter(&self) -> impl Iterator<Item = (AngleKind, f64)> + '_ {
        AngleKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }

    pub fn is_finite(&self) -> bool {
        self.iter().all(|(_, value)| value.is_finite())
    }

    /// Only the three joint angles set, verticals zero
    pub fn joints(knee: f64, hip: f64, arm: f64) -> Self {
        Self {
            knee,
            hip,
            arm,
            ..Self::default()
        }
    }
}
