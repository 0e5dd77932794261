// Conflicts - Physically impossible moments in a pattern
// Reported by the validator, paired with a resolution by the fixer

use serde::{Deserialize, Serialize};

use crate::model::Beat;

/// Which limb constraint a cluster breaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConflictKind {
    /// More hand strikes than the two hands available
    TooManyHands { required: usize },

    /// Ride and hand hi-hat both need the same timekeeping hand
    RideHiHat,
}

/// A cluster that violates a limb constraint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    /// Position of the cluster anchor (beats)
    pub position: f64,

    pub kind: ConflictKind,

    /// The offending beats (hand beats, or the ride and hi-hat beats)
    pub beats: Vec<Beat>,
}

impl Conflict {
    pub fn reason(&self) -> String {
        match self.kind {
            ConflictKind::TooManyHands { required } => {
                format!("Requires {} hands, drummer has only 2", required)
            }
            ConflictKind::RideHiHat => {
                "Ride cymbal and hi-hat (hand) cannot be played simultaneously".to_string()
            }
        }
    }
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.beats.iter().map(|b| b.instrument().name()).collect();
        write!(
            f,
            "At beat {:.2}: {} (instruments: {})",
            self.position,
            self.reason(),
            names.join(", ")
        )
    }
}

/// A ride/hi-hat loser rewritten as a foot "chick"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub from: Beat,
    pub to: Beat,
}

/// What the fixer did to clear one conflict
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub dropped: Vec<Beat>,
    pub converted: Vec<Conversion>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.dropped.is_empty() && self.converted.is_empty()
    }
}

/// A conflict together with how it was cleared
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedConflict {
    pub conflict: Conflict,
    pub resolution: Resolution,
}
