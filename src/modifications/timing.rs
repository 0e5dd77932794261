// Timing Modifications - Behind-the-beat, shuffle, pocket and quantize feels
// Move onsets in time; none of these add or remove beats

use serde::{Deserialize, Serialize};

use crate::config::{ms_to_beats, note, velocity, TEMPO_DEFAULT};
use crate::model::{Instrument, Pattern, VoiceClass};
use crate::rng::{symmetric, StageRng};

/// Lay one voice class back behind the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehindBeatTiming {
    /// Delay at full intensity (ms)
    pub max_delay_ms: f64,

    /// Voice class that drags
    pub target: VoiceClass,

    /// Tempo used to convert the delay into beats
    pub reference_tempo: f64,
}

impl Default for BehindBeatTiming {
    fn default() -> Self {
        BehindBeatTiming {
            max_delay_ms: 20.0,
            target: VoiceClass::Snare,
            reference_tempo: TEMPO_DEFAULT,
        }
    }
}

impl BehindBeatTiming {
    pub fn apply(&self, pattern: &Pattern, intensity: f64) -> Pattern {
        let delay = ms_to_beats(self.max_delay_ms * intensity, self.reference_tempo);

        let beats = pattern
            .beats()
            .iter()
            .map(|beat| {
                if beat.instrument().voice_class() == self.target && !beat.is_ghost() {
                    beat.clone().shifted(delay)
                } else {
                    beat.clone()
                }
            })
            .collect();

        pattern.derive("behind_beat", beats)
    }
}

/// Push off-beat sixteenths late for a shuffled feel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShuffleFeel {
    /// 0.33 = triplet shuffle
    pub shuffle_amount: f64,
}

impl Default for ShuffleFeel {
    fn default() -> Self {
        ShuffleFeel { shuffle_amount: 0.33 }
    }
}

impl ShuffleFeel {
    pub fn apply(&self, pattern: &Pattern, intensity: f64) -> Pattern {
        let push = self.shuffle_amount * note::SIXTEENTH * intensity;

        let beats = pattern
            .beats()
            .iter()
            .map(|beat| {
                if is_offbeat_sixteenth(beat.position()) {
                    beat.clone().shifted(push)
                } else {
                    beat.clone()
                }
            })
            .collect();

        let swing = if intensity > 0.0 {
            pattern.swing_ratio.max(self.shuffle_amount)
        } else {
            pattern.swing_ratio
        };

        pattern.derive("shuffle", beats).with_swing_ratio(swing)
    }
}

/// Positions on the "e" or "a" of a beat (x.25 / x.75)
fn is_offbeat_sixteenth(position: f64) -> bool {
    let within = position.rem_euclid(1.0);
    (within - 0.25).abs() < 0.01 || (within - 0.75).abs() < 0.01
}

/// Small random push and pull on time-keeping and ghost notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PocketStretching {
    /// Maximum offset either side of the grid at full intensity (ms)
    pub variation_ms: f64,

    pub reference_tempo: f64,
}

impl Default for PocketStretching {
    fn default() -> Self {
        PocketStretching {
            variation_ms: 5.0,
            reference_tempo: TEMPO_DEFAULT,
        }
    }
}

impl PocketStretching {
    pub fn apply(&self, pattern: &Pattern, intensity: f64, rng: &mut StageRng) -> Pattern {
        let bound = ms_to_beats(self.variation_ms * intensity, self.reference_tempo);

        let beats = pattern
            .beats()
            .iter()
            .map(|beat| {
                if beat.instrument().is_hand_hihat() || beat.is_ghost() {
                    beat.clone().shifted(symmetric(rng, bound))
                } else {
                    beat.clone()
                }
            })
            .collect();

        pattern.derive("pocket", beats)
    }
}

/// Machine-like grid snapping and kick/snare velocity levelling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MechanicalPrecision {
    /// How far positions move toward the 32nd grid at full intensity
    pub quantize_amount: f64,
}

impl Default for MechanicalPrecision {
    fn default() -> Self {
        MechanicalPrecision { quantize_amount: 0.95 }
    }
}

impl MechanicalPrecision {
    pub fn apply(&self, pattern: &Pattern, intensity: f64) -> Pattern {
        let blend = (self.quantize_amount * intensity).clamp(0.0, 1.0);
        let grid = note::THIRTY_SECOND;

        let beats = pattern
            .beats()
            .iter()
            .map(|beat| {
                let snapped = (beat.position() / grid).round() * grid;
                let position = beat.position() * (1.0 - blend) + snapped * blend;

                let target = match beat.instrument() {
                    Instrument::Kick => Some(velocity::KICK_HEAVY),
                    Instrument::Snare => Some(velocity::SNARE_HEAVY),
                    _ => None,
                };
                let vel = match target {
                    Some(target) => {
                        let current = beat.velocity() as f64;
                        (current * (1.0 - blend * 0.5) + target as f64 * blend * 0.5) as i32
                    }
                    None => beat.velocity() as i32,
                };

                beat.clone().with_position(position).with_velocity(vel)
            })
            .collect();

        pattern.derive("mechanical", beats)
    }
}
