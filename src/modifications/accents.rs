// Accent Modifications - Dynamic contrast, consistency and displaced accents

use serde::{Deserialize, Serialize};

use crate::config::velocity;
use crate::model::{Instrument, Pattern};
use crate::rng::{chance, StageRng};

/// Louder accents, quieter ghosts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeavyAccents {
    /// Velocity added to accents at full intensity
    pub accent_boost: i32,
}

impl Default for HeavyAccents {
    fn default() -> Self {
        HeavyAccents { accent_boost: 15 }
    }
}

impl HeavyAccents {
    pub fn apply(&self, pattern: &Pattern, intensity: f64) -> Pattern {
        let boost = (self.accent_boost as f64 * intensity) as i32;
        let cut = (10.0 * intensity) as i32;

        let beats = pattern
            .beats()
            .iter()
            .map(|beat| {
                let vel = beat.velocity() as i32;
                if beat.is_accent() {
                    beat.clone().with_velocity(vel + boost)
                } else if beat.is_ghost() {
                    beat.clone().with_velocity((vel - cut).max(velocity::GHOST_FLOOR))
                } else {
                    beat.clone()
                }
            })
            .collect();

        pattern.derive("heavy_accents", beats)
    }
}

/// Even kick, snare and closed hi-hat dynamics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedPrecision {
    /// Blend toward the target velocities at full intensity
    pub consistency: f64,
}

impl Default for SpeedPrecision {
    fn default() -> Self {
        SpeedPrecision { consistency: 0.9 }
    }
}

impl SpeedPrecision {
    fn target(instrument: Instrument) -> Option<i32> {
        match instrument {
            Instrument::Kick => Some(velocity::KICK_HEAVY),
            Instrument::Snare => Some(velocity::SNARE_HEAVY),
            Instrument::ClosedHiHat => Some(velocity::HIHAT_NORMAL),
            _ => None,
        }
    }

    pub fn apply(&self, pattern: &Pattern, intensity: f64) -> Pattern {
        let blend = (self.consistency * intensity).clamp(0.0, 1.0);

        let beats = pattern
            .beats()
            .iter()
            .map(|beat| match Self::target(beat.instrument()) {
                Some(target) => {
                    let vel = beat.velocity() as f64 * (1.0 - blend) + target as f64 * blend;
                    beat.clone().with_velocity(vel as i32)
                }
                None => beat.clone(),
            })
            .collect();

        pattern.derive("precision", beats)
    }
}

/// Move accents somewhere unexpected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwistedAccents {
    /// Chance an existing accent is removed at full intensity
    pub displacement: f64,
}

impl Default for TwistedAccents {
    fn default() -> Self {
        TwistedAccents { displacement: 0.5 }
    }
}

impl TwistedAccents {
    pub fn apply(&self, pattern: &Pattern, intensity: f64, rng: &mut StageRng) -> Pattern {
        let remove = self.displacement * intensity;
        let add = remove * 0.3;

        let beats = pattern
            .beats()
            .iter()
            .map(|beat| {
                let accent = if beat.is_accent() {
                    !chance(rng, remove)
                } else {
                    beat.instrument() == Instrument::Snare && chance(rng, add)
                };
                beat.clone().with_accent(accent)
            })
            .collect();

        pattern.derive("twisted", beats)
    }
}
