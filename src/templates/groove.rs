// Groove Templates - Backbeats, double bass and blast beats
// The kick/snare/hi-hat foundations most patterns are built on

use serde::{Deserialize, Serialize};

use super::builder::{slots, PatternBuilder};
use super::BuildContext;
use crate::config::{note, velocity, GRID_EPSILON};
use crate::model::Instrument;

/// Standard backbeat: kicks, snares and a steady hi-hat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicGroove {
    /// Kick offsets within the bar (beats)
    pub kick_positions: Vec<f64>,

    /// Snare offsets within the bar (beats)
    pub snare_positions: Vec<f64>,

    /// Spacing of the hi-hat ostinato (beats)
    pub hihat_subdivision: f64,

    /// Hi-hat offsets played open instead of closed
    pub open_hihat_positions: Vec<f64>,
}

impl Default for BasicGroove {
    fn default() -> Self {
        BasicGroove {
            kick_positions: vec![0.0, 2.0],
            snare_positions: vec![1.0, 3.0],
            hihat_subdivision: note::EIGHTH,
            open_hihat_positions: Vec::new(),
        }
    }
}

impl BasicGroove {
    pub fn generate(&self, builder: &mut PatternBuilder, ctx: &BuildContext) {
        let kick_velocity = velocity::KICK_NORMAL + (ctx.complexity * 10.0) as i32;
        let snare_velocity = velocity::SNARE_NORMAL + (ctx.dynamics * 12.0) as i32;
        let subdivision = if self.hihat_subdivision > 0.0 {
            self.hihat_subdivision
        } else {
            note::EIGHTH
        };
        let hat_count = slots(builder.beats_per_bar(), subdivision);

        for bar in 0..ctx.bars {
            for &pos in &self.kick_positions {
                builder.hit(bar, pos, Instrument::Kick, kick_velocity);
            }
            for &pos in &self.snare_positions {
                builder.hit(bar, pos, Instrument::Snare, snare_velocity);
            }
            for i in 0..hat_count {
                let pos = i as f64 * subdivision;
                let open = self
                    .open_hihat_positions
                    .iter()
                    .any(|&p| (p - pos).abs() < GRID_EPSILON);

                if open {
                    builder.hit(bar, pos, Instrument::OpenHiHat, velocity::HIHAT_OPEN);
                } else {
                    builder.hit(bar, pos, Instrument::ClosedHiHat, velocity::HIHAT_NORMAL);
                }
            }
        }
    }
}

/// Double bass figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PedalStyle {
    /// Unbroken alternating strokes
    #[default]
    Continuous,
    /// Two-eighths-and-a-quarter gallop
    Gallop,
    /// Eighth-note triplets
    Triplet,
}

/// Fast alternating kick patterns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoubleBassPedal {
    /// Stroke spacing for the continuous style (beats)
    pub subdivision: f64,

    /// Velocity scale
    pub intensity: f64,

    pub style: PedalStyle,
}

impl Default for DoubleBassPedal {
    fn default() -> Self {
        DoubleBassPedal {
            subdivision: note::SIXTEENTH,
            intensity: 1.0,
            style: PedalStyle::Continuous,
        }
    }
}

impl DoubleBassPedal {
    const GALLOP: [f64; 6] = [0.0, 0.5, 1.0, 2.0, 2.5, 3.0];

    pub fn generate(&self, builder: &mut PatternBuilder, ctx: &BuildContext) {
        let scale = |v: i32| (v as f64 * self.intensity) as i32;

        for bar in 0..ctx.bars {
            match self.style {
                PedalStyle::Continuous => {
                    let subdivision = if self.subdivision > 0.0 {
                        self.subdivision
                    } else {
                        note::SIXTEENTH
                    };
                    for i in 0..slots(builder.beats_per_bar(), subdivision) {
                        let base = if i % 2 == 0 {
                            velocity::KICK_NORMAL
                        } else {
                            velocity::KICK_LIGHT
                        };
                        let vel = scale(base).clamp(velocity::KICK_WHISPER, 127);
                        builder.hit(bar, i as f64 * subdivision, Instrument::Kick, vel);
                    }
                }
                PedalStyle::Gallop => {
                    for (i, &pos) in Self::GALLOP.iter().enumerate() {
                        let base = if i % 3 == 0 {
                            velocity::KICK_HEAVY
                        } else {
                            velocity::KICK_NORMAL
                        };
                        builder.hit(bar, pos, Instrument::Kick, scale(base));
                    }
                }
                PedalStyle::Triplet => {
                    for i in 0..slots(builder.beats_per_bar(), note::EIGHTH_TRIPLET) {
                        let pos = i as f64 * note::EIGHTH_TRIPLET;
                        builder.hit(bar, pos, Instrument::Kick, scale(velocity::KICK_NORMAL));
                    }
                }
            }
        }
    }
}

/// Blast beat variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlastStyle {
    /// Kick, snare and hat together on every eighth
    #[default]
    Traditional,
    /// Kick on quarters, snare and light hat on sixteenths
    Hammer,
    /// Kick on sixteenths, snare and ride on eighths
    Gravity,
}

/// Extreme-metal blast beats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlastBeat {
    pub style: BlastStyle,

    /// Velocity scale for kick and snare
    pub intensity: f64,
}

impl Default for BlastBeat {
    fn default() -> Self {
        BlastBeat {
            style: BlastStyle::Traditional,
            intensity: 1.0,
        }
    }
}

impl BlastBeat {
    pub fn generate(&self, builder: &mut PatternBuilder, ctx: &BuildContext) {
        let kick = (velocity::KICK_HEAVY as f64 * self.intensity) as i32;
        let snare_heavy = (velocity::SNARE_HEAVY as f64 * self.intensity) as i32;
        let snare_normal = (velocity::SNARE_NORMAL as f64 * self.intensity) as i32;
        let bar_length = builder.beats_per_bar();

        for bar in 0..ctx.bars {
            match self.style {
                BlastStyle::Traditional => {
                    for i in 0..slots(bar_length, note::EIGHTH) {
                        let pos = i as f64 * note::EIGHTH;
                        builder.hit(bar, pos, Instrument::Kick, kick);
                        builder.hit(bar, pos, Instrument::Snare, snare_heavy);
                        builder.hit(bar, pos, Instrument::ClosedHiHat, velocity::HIHAT_NORMAL);
                    }
                }
                BlastStyle::Hammer => {
                    for i in (0..slots(bar_length, note::EIGHTH)).step_by(2) {
                        builder.hit(bar, i as f64 * note::EIGHTH, Instrument::Kick, kick);
                    }
                    for i in 0..slots(bar_length, note::SIXTEENTH) {
                        let pos = i as f64 * note::SIXTEENTH;
                        builder.hit(bar, pos, Instrument::Snare, snare_heavy);
                        builder.hit(bar, pos, Instrument::ClosedHiHat, velocity::HIHAT_LIGHT);
                    }
                }
                BlastStyle::Gravity => {
                    for i in 0..slots(bar_length, note::SIXTEENTH) {
                        let pos = i as f64 * note::SIXTEENTH;
                        builder.hit(bar, pos, Instrument::Kick, kick);
                        if i % 2 == 0 {
                            builder.hit(bar, pos, Instrument::Snare, snare_normal);
                            builder.hit(bar, pos, Instrument::Ride, velocity::RIDE_NORMAL);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TimeSignature;

    fn run(generate: impl Fn(&mut PatternBuilder, &BuildContext), bars: u32) -> crate::model::Pattern {
        let mut builder = PatternBuilder::new("t", TimeSignature::FOUR_FOUR);
        generate(&mut builder, &BuildContext::new(bars, 0.5));
        builder.build()
    }

    #[test]
    fn test_basic_groove_single_bar() {
        let pattern = run(|b, c| BasicGroove::default().generate(b, c), 1);
        assert_eq!(pattern.len(), 12);
        assert_eq!(pattern.beats_for(Instrument::Kick).len(), 2);
        assert_eq!(pattern.beats_for(Instrument::Snare).len(), 2);
        assert_eq!(pattern.beats_for(Instrument::ClosedHiHat).len(), 8);
        // 110 + 10 * 0.5
        assert_eq!(pattern.beats_for(Instrument::Kick)[0].velocity(), 115);
    }

    #[test]
    fn test_basic_groove_repeats_every_bar() {
        let pattern = run(|b, c| BasicGroove::default().generate(b, c), 4);
        assert_eq!(pattern.len(), 48);
        assert_eq!(pattern.bar_count(), 4);
        assert_eq!(pattern.beats_for(Instrument::Snare).last().unwrap().position(), 15.0);
    }

    #[test]
    fn test_open_hihat_positions() {
        let groove = BasicGroove {
            open_hihat_positions: vec![3.5],
            ..Default::default()
        };
        let pattern = run(|b, c| groove.generate(b, c), 1);
        let open = pattern.beats_for(Instrument::OpenHiHat);
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].position(), 3.5);
        assert_eq!(open[0].velocity(), 100);
        assert_eq!(pattern.beats_for(Instrument::ClosedHiHat).len(), 7);
    }

    #[test]
    fn test_double_bass_styles() {
        let continuous = run(|b, c| DoubleBassPedal::default().generate(b, c), 1);
        assert_eq!(continuous.len(), 16);
        assert_eq!(continuous.beats()[0].velocity(), 110);
        assert_eq!(continuous.beats()[1].velocity(), 95);

        let gallop = DoubleBassPedal {
            style: PedalStyle::Gallop,
            ..Default::default()
        };
        let gallop = run(|b, c| gallop.generate(b, c), 1);
        assert_eq!(gallop.len(), 6);
        assert_eq!(gallop.beats()[0].velocity(), 120);
        assert_eq!(gallop.beats()[1].velocity(), 110);

        let triplet = DoubleBassPedal {
            style: PedalStyle::Triplet,
            ..Default::default()
        };
        assert_eq!(run(|b, c| triplet.generate(b, c), 1).len(), 12);
    }

    #[test]
    fn test_continuous_floor_velocity() {
        let soft = DoubleBassPedal {
            intensity: 0.1,
            ..Default::default()
        };
        let pattern = run(|b, c| soft.generate(b, c), 1);
        assert!(pattern.beats().iter().all(|b| b.velocity() == 60));
    }

    #[test]
    fn test_blast_beat_styles() {
        let traditional = run(|b, c| BlastBeat::default().generate(b, c), 1);
        assert_eq!(traditional.len(), 24);

        let hammer = BlastBeat {
            style: BlastStyle::Hammer,
            intensity: 1.0,
        };
        let hammer = run(|b, c| hammer.generate(b, c), 1);
        assert_eq!(hammer.beats_for(Instrument::Kick).len(), 4);
        assert_eq!(hammer.beats_for(Instrument::Snare).len(), 16);

        let gravity = BlastBeat {
            style: BlastStyle::Gravity,
            intensity: 1.0,
        };
        let gravity = run(|b, c| gravity.generate(b, c), 1);
        assert_eq!(gravity.beats_for(Instrument::Kick).len(), 16);
        assert_eq!(gravity.beats_for(Instrument::Ride).len(), 8);
    }

    #[test]
    fn test_odd_meter_respects_bar_length() {
        let mut builder = PatternBuilder::new("waltz", TimeSignature::THREE_FOUR);
        BasicGroove::default().generate(&mut builder, &BuildContext::new(1, 0.5));
        let pattern = builder.build();
        // Snare on beat 4 does not exist in 3/4
        assert_eq!(pattern.beats_for(Instrument::Snare).len(), 1);
        assert_eq!(pattern.beats_for(Instrument::ClosedHiHat).len(), 6);
    }
}
