// Physical Validator - Checks a pattern against a four-limbed drummer
// Two hands for any hand voice; right foot on the kick, left foot on the hi-hat pedal

use serde::{Deserialize, Serialize};

use super::conflict::{Conflict, ConflictKind};
use crate::config::SIMULTANEITY_TOLERANCE_BEATS;
use crate::model::{Beat, Cluster, Pattern};

/// Hands available to the performer
pub const HANDS: usize = 2;

/// Validator settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Window (beats) within which onsets count as simultaneous.
    /// Heuristic; may need empirical tuning.
    pub tolerance: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        ValidatorConfig {
            tolerance: SIMULTANEITY_TOLERANCE_BEATS,
        }
    }
}

/// Summary counts for one validated pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationStats {
    pub total_beats: usize,
    pub total_conflicts: usize,
    pub hand_limit: usize,
    pub ride_hihat: usize,
    pub is_valid: bool,
}

/// Reports clusters a human drummer cannot play
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    pub fn new(config: ValidatorConfig) -> Self {
        Validator { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Every conflict in the pattern, in position order
    pub fn validate(&self, pattern: &Pattern) -> Vec<Conflict> {
        let beats = pattern.beats();
        let conflicts: Vec<Conflict> = pattern
            .clusters(self.config.tolerance)
            .iter()
            .flat_map(|cluster| check_cluster(cluster, beats))
            .collect();

        if !conflicts.is_empty() {
            log::warn!(
                "Pattern '{}' has {} physical conflicts",
                pattern.name,
                conflicts.len()
            );
            for conflict in &conflicts {
                log::debug!("  {}", conflict);
            }
        }

        conflicts
    }

    pub fn is_valid(&self, pattern: &Pattern) -> bool {
        pattern
            .clusters(self.config.tolerance)
            .iter()
            .all(|cluster| check_cluster(cluster, pattern.beats()).is_empty())
    }

    pub fn statistics(&self, pattern: &Pattern) -> ValidationStats {
        let conflicts = self.validate(pattern);
        let hand_limit = conflicts
            .iter()
            .filter(|c| matches!(c.kind, ConflictKind::TooManyHands { .. }))
            .count();

        ValidationStats {
            total_beats: pattern.len(),
            total_conflicts: conflicts.len(),
            hand_limit,
            ride_hihat: conflicts.len() - hand_limit,
            is_valid: conflicts.is_empty(),
        }
    }
}

/// Conflicts within one simultaneity cluster (zero, one or both kinds)
pub(crate) fn check_cluster(cluster: &Cluster, beats: &[Beat]) -> Vec<Conflict> {
    let members: Vec<&Beat> = cluster.beats(beats).collect();
    let mut conflicts = Vec::new();

    let hands: Vec<Beat> = members
        .iter()
        .filter(|b| b.instrument().is_hand())
        .map(|&b| b.clone())
        .collect();
    if hands.len() > HANDS {
        conflicts.push(Conflict {
            position: cluster.position,
            kind: ConflictKind::TooManyHands {
                required: hands.len(),
            },
            beats: hands,
        });
    }

    // Pedal hi-hat is a foot voice, so it never takes part here
    let timekeeping: Vec<Beat> = members
        .iter()
        .filter(|b| b.instrument().is_ride() || b.instrument().is_hand_hihat())
        .map(|&b| b.clone())
        .collect();
    let has_ride = timekeeping.iter().any(|b| b.instrument().is_ride());
    let has_hat = timekeeping.iter().any(|b| b.instrument().is_hand_hihat());
    if has_ride && has_hat {
        conflicts.push(Conflict {
            position: cluster.position,
            kind: ConflictKind::RideHiHat,
            beats: timekeeping,
        });
    }

    conflicts
}
