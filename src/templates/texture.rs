// Texture Templates - Jazz ride time and funk ghost-note snare
// Lighter, swung or probabilistic layers on top of a groove

use serde::{Deserialize, Serialize};

use super::builder::{slots, PatternBuilder};
use super::BuildContext;
use crate::config::{note, velocity, GRID_EPSILON};
use crate::model::Instrument;
use crate::rng::{chance, StageRng};

/// Ride accent vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideAccent {
    /// Subtle lift on each half bar
    #[default]
    Standard,
    /// Accent every fourth triplet slot
    Elvin,
    /// Accent every beat
    Tony,
}

impl RideAccent {
    fn velocity(&self, slot: u32) -> i32 {
        match self {
            RideAccent::Elvin if slot % 4 == 0 => velocity::RIDE_NORMAL,
            RideAccent::Elvin => velocity::RIDE_LIGHT,
            RideAccent::Tony if slot % 3 == 0 => velocity::RIDE_ACCENT,
            RideAccent::Tony => velocity::RIDE_NORMAL,
            RideAccent::Standard if slot % 6 == 0 => velocity::RIDE_NORMAL,
            RideAccent::Standard => velocity::RIDE_LIGHT,
        }
    }
}

/// Swung ride cymbal on the triplet grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JazzRidePattern {
    /// Swing ratio recorded on the built pattern
    pub swing_ratio: f64,

    pub accent: RideAccent,

    /// Play every fourth triplet slot on the bell
    pub use_bell: bool,
}

impl Default for JazzRidePattern {
    fn default() -> Self {
        JazzRidePattern {
            swing_ratio: 0.33,
            accent: RideAccent::Standard,
            use_bell: false,
        }
    }
}

impl JazzRidePattern {
    pub fn generate(&self, builder: &mut PatternBuilder, ctx: &BuildContext) {
        builder.swing(self.swing_ratio);
        let slot_count = slots(builder.beats_per_bar(), note::EIGHTH_TRIPLET);

        for bar in 0..ctx.bars {
            // Slots 0 and 2 of each triplet: "ding, da-ding"
            for slot in (0..slot_count).filter(|s| s % 3 != 1) {
                let pos = slot as f64 * note::EIGHTH_TRIPLET;
                let vel = self.accent.velocity(slot);

                if self.use_bell && slot % 4 == 0 {
                    builder.hit(bar, pos, Instrument::RideBell, vel);
                } else {
                    builder.hit(bar, pos, Instrument::Ride, vel);
                }
            }
        }
    }
}

/// Funk snare: backbeats, "the one" and probabilistic ghost notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunkGhostNotes {
    /// Base probability of a ghost note on a free sixteenth [0.0, 1.0]
    pub density: f64,

    /// Put a heavy kick on the downbeat
    pub emphasize_one: bool,

    /// Backbeat offsets within the bar
    pub main_snare_positions: Vec<f64>,
}

impl Default for FunkGhostNotes {
    fn default() -> Self {
        FunkGhostNotes {
            density: 0.7,
            emphasize_one: true,
            main_snare_positions: vec![1.0, 3.0],
        }
    }
}

impl FunkGhostNotes {
    pub fn generate(&self, builder: &mut PatternBuilder, ctx: &BuildContext, rng: &mut StageRng) {
        let probability = self.density.clamp(0.0, 1.0) * (0.5 + 0.5 * ctx.complexity as f64);
        let slot_count = slots(builder.beats_per_bar(), note::SIXTEENTH);

        for bar in 0..ctx.bars {
            for &pos in &self.main_snare_positions {
                builder.hit(bar, pos, Instrument::Snare, velocity::SNARE_NORMAL);
            }

            for slot in 0..slot_count {
                let pos = slot as f64 * note::SIXTEENTH;
                let is_main = self
                    .main_snare_positions
                    .iter()
                    .any(|&p| (p - pos).abs() < GRID_EPSILON);
                if is_main {
                    continue;
                }

                if self.emphasize_one && slot == 0 {
                    builder.hit(bar, pos, Instrument::Kick, velocity::KICK_HEAVY);
                    continue;
                }

                if chance(rng, probability) {
                    builder.ghost(bar, pos, Instrument::Snare, velocity::SNARE_GHOST);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TimeSignature;
    use crate::rng::seeded;

    #[test]
    fn test_jazz_ride_slots() {
        let mut builder = PatternBuilder::new("jazz", TimeSignature::FOUR_FOUR);
        JazzRidePattern::default().generate(&mut builder, &BuildContext::new(1, 0.5));
        let pattern = builder.build();

        // Two of every three triplet slots over four beats
        assert_eq!(pattern.beats_for(Instrument::Ride).len(), 8);
        assert_eq!(pattern.swing_ratio, 0.33);
        assert_eq!(pattern.beats()[0].velocity(), 90);
        assert_eq!(pattern.beats()[1].velocity(), 70);
    }

    #[test]
    fn test_jazz_ride_bell() {
        let ride = JazzRidePattern {
            use_bell: true,
            ..Default::default()
        };
        let mut builder = PatternBuilder::new("jazz", TimeSignature::FOUR_FOUR);
        ride.generate(&mut builder, &BuildContext::new(1, 0.5));
        let pattern = builder.build();

        // Slots 0, 8 (and 4 is a skipped middle triplet)
        assert_eq!(pattern.beats_for(Instrument::RideBell).len(), 2);
        assert_eq!(pattern.len(), 8);
    }

    #[test]
    fn test_funk_ghosts_are_flagged() {
        let mut builder = PatternBuilder::new("funk", TimeSignature::FOUR_FOUR);
        let mut rng = seeded(11);
        FunkGhostNotes {
            density: 1.0,
            ..Default::default()
        }
        .generate(&mut builder, &BuildContext::new(1, 1.0), &mut rng);
        let pattern = builder.build();

        // density 1 at complexity 1: every free sixteenth gets a ghost
        let ghosts: Vec<_> = pattern.beats().iter().filter(|b| b.is_ghost()).collect();
        assert_eq!(ghosts.len(), 13);
        assert!(ghosts.iter().all(|b| b.velocity() == 40));
        assert_eq!(pattern.beats_for(Instrument::Kick).len(), 1);
    }

    #[test]
    fn test_funk_zero_density_keeps_backbeat() {
        let mut builder = PatternBuilder::new("funk", TimeSignature::FOUR_FOUR);
        let mut rng = seeded(11);
        FunkGhostNotes {
            density: 0.0,
            ..Default::default()
        }
        .generate(&mut builder, &BuildContext::new(2, 0.5), &mut rng);
        let pattern = builder.build();
        assert_eq!(pattern.len(), 6);
    }

    #[test]
    fn test_funk_is_deterministic_per_seed() {
        let build = |seed| {
            let mut builder = PatternBuilder::new("funk", TimeSignature::FOUR_FOUR);
            FunkGhostNotes::default().generate(&mut builder, &BuildContext::new(4, 0.5), &mut seeded(seed));
            builder.build()
        };
        assert_eq!(build(5), build(5));
    }
}
