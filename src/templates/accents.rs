// Accent Templates - Crash punctuation and tom fills
// Mark section starts and lead into the next bar

use serde::{Deserialize, Serialize};

use super::builder::{slots, PatternBuilder};
use super::BuildContext;
use crate::config::{note, velocity};
use crate::model::Instrument;
use crate::rng::{chance, StageRng};

/// Crash (or china) hits at fixed offsets in every bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrashAccents {
    pub positions: Vec<f64>,
    pub use_china: bool,
    pub intensity: f64,
}

impl Default for CrashAccents {
    fn default() -> Self {
        CrashAccents {
            positions: vec![0.0],
            use_china: false,
            intensity: 1.0,
        }
    }
}

impl CrashAccents {
    pub fn generate(&self, builder: &mut PatternBuilder, ctx: &BuildContext) {
        let instrument = if self.use_china {
            Instrument::China
        } else {
            Instrument::Crash
        };
        let vel = (velocity::CRASH_NORMAL as f64 * self.intensity) as i32;

        for bar in 0..ctx.bars {
            for &pos in &self.positions {
                builder.hit(bar, pos, instrument, vel);
            }
        }
    }
}

/// Order the toms are struck in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillDirection {
    #[default]
    Descending,
    Ascending,
    Around,
}

impl FillDirection {
    fn voicing(&self) -> ([Instrument; 4], i32) {
        use Instrument::{FloorTom, MidTom};
        match self {
            FillDirection::Descending => ([MidTom, MidTom, FloorTom, FloorTom], velocity::TOM_HEAVY),
            FillDirection::Ascending => ([FloorTom, FloorTom, MidTom, MidTom], velocity::TOM_HEAVY),
            FillDirection::Around => ([MidTom, FloorTom, MidTom, FloorTom], velocity::TOM_NORMAL),
        }
    }
}

/// Short tom run at the end of a bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomFill {
    pub direction: FillDirection,

    /// Spacing between tom strokes (beats)
    pub subdivision: f64,

    /// Fill start offset within the bar
    pub start_position: f64,
}

impl Default for TomFill {
    fn default() -> Self {
        TomFill {
            direction: FillDirection::Descending,
            subdivision: note::SIXTEENTH,
            start_position: 3.0,
        }
    }
}

impl TomFill {
    /// Longest run a fill plays
    pub const MAX_STROKES: usize = 4;

    /// Fills the last bar always and earlier bars with probability `fill_frequency`
    pub fn generate(&self, builder: &mut PatternBuilder, ctx: &BuildContext, rng: &mut StageRng) {
        let bar_length = builder.beats_per_bar();
        let subdivision = if self.subdivision > 0.0 && self.subdivision <= bar_length {
            self.subdivision
        } else {
            note::SIXTEENTH
        };

        // Keep room for at least one stroke inside the bar
        let start = if self.start_position.is_finite() {
            self.start_position.clamp(0.0, (bar_length - subdivision).max(0.0))
        } else {
            0.0
        };
        let strokes = (slots(bar_length - start, subdivision) as usize).clamp(1, Self::MAX_STROKES);
        let (voices, vel) = self.direction.voicing();

        for bar in 0..ctx.bars {
            let last_bar = bar + 1 == ctx.bars;
            if !last_bar && !chance(rng, ctx.fill_frequency as f64) {
                continue;
            }

            for (i, &voice) in voices.iter().take(strokes).enumerate() {
                builder.hit(bar, start + i as f64 * subdivision, voice, vel);
            }
        }
    }
}
