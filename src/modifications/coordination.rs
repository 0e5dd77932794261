// Coordination Modifications - Linear playing and sparse cymbal work
// Thin the pattern out; these are the stages the empty-result guard protects

use serde::{Deserialize, Serialize};

use crate::config::{VoicePriority, SIMULTANEITY_TOLERANCE_BEATS};
use crate::model::{Instrument, Pattern};
use crate::rng::{chance, StageRng};

/// One voice at a time: each simultaneity cluster keeps its strongest beat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearCoordination {
    pub priority: VoicePriority,

    /// Simultaneity window (beats)
    pub tolerance: f64,
}

impl Default for LinearCoordination {
    fn default() -> Self {
        LinearCoordination {
            priority: VoicePriority::default(),
            tolerance: SIMULTANEITY_TOLERANCE_BEATS,
        }
    }
}

impl LinearCoordination {
    /// At intensity 1.0 every cluster is linearized; below that, each with probability `intensity`
    pub fn apply(&self, pattern: &Pattern, intensity: f64, rng: &mut StageRng) -> Pattern {
        let source = pattern.beats();
        let mut beats = Vec::with_capacity(source.len());

        for cluster in pattern.clusters(self.tolerance) {
            let members: Vec<_> = cluster.beats(source).collect();
            let linearize = members.len() > 1 && (intensity >= 1.0 || chance(rng, intensity));

            if linearize {
                if let Some(keep) = self.priority.strongest(&members) {
                    beats.push(members[keep].clone());
                }
            } else {
                beats.extend(members.into_iter().cloned());
            }
        }

        pattern.derive("linear", beats)
    }
}

/// Sparse, atmospheric time-keeping: thins hi-hat and ride hits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimalCreativity {
    /// Chance a time-keeping hit is dropped at full intensity
    pub sparseness: f64,
}

impl Default for MinimalCreativity {
    fn default() -> Self {
        MinimalCreativity { sparseness: 0.6 }
    }
}

impl MinimalCreativity {
    pub fn apply(&self, pattern: &Pattern, intensity: f64, rng: &mut StageRng) -> Pattern {
        let probability = self.sparseness * intensity;

        let beats = pattern
            .beats()
            .iter()
            .filter(|beat| {
                let time_keeping =
                    beat.instrument().is_hand_hihat() || beat.instrument() == Instrument::Ride;
                !(time_keeping && chance(rng, probability))
            })
            .cloned()
            .collect();

        pattern.derive("minimal", beats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Beat, TimeSignature};
    use crate::rng::seeded;
    use crate::templates::basic_rock;

    #[test]
    fn test_linear_leaves_one_beat_per_cluster() {
        let input = basic_rock(1, 0.5);
        assert_eq!(input.len(), 12);

        let output = LinearCoordination::default().apply(&input, 1.0, &mut seeded(1));
        for cluster in output.clusters(SIMULTANEITY_TOLERANCE_BEATS) {
            assert_eq!(cluster.len(), 1);
        }
        // Kicks and snares win their clusters; hats survive only on the offbeats
        assert_eq!(output.len(), 8);
        assert_eq!(output.beats_for(Instrument::Kick).len(), 2);
        assert_eq!(output.beats_for(Instrument::Snare).len(), 2);
    }

    #[test]
    fn test_linear_zero_intensity_keeps_all() {
        let input = basic_rock(2, 0.5);
        let output = LinearCoordination::default().apply(&input, 0.0, &mut seeded(1));
        assert_eq!(output.beats(), input.beats());
    }

    #[test]
    fn test_linear_priority_order() {
        let input = Pattern::from_beats(
            "stack",
            TimeSignature::FOUR_FOUR,
            vec![
                Beat::new(0.0, Instrument::Crash, 127).unwrap(),
                Beat::new(0.0, Instrument::Kick, 100).unwrap(),
                Beat::new(0.01, Instrument::MidTom, 100).unwrap(),
            ],
        );
        let output = LinearCoordination::default().apply(&input, 1.0, &mut seeded(1));
        assert_eq!(output.len(), 1);
        assert_eq!(output.beats()[0].instrument(), Instrument::Kick);
    }

    #[test]
    fn test_minimal_keeps_drums() {
        let input = basic_rock(2, 0.5);
        let output = MinimalCreativity { sparseness: 1.0 }.apply(&input, 1.0, &mut seeded(3));

        assert!(output.beats_for(Instrument::ClosedHiHat).is_empty());
        assert_eq!(output.beats_for(Instrument::Kick).len(), 4);
        assert_eq!(output.beats_for(Instrument::Snare).len(), 4);
    }
}
