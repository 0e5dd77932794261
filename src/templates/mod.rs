// Template Library - Reusable structural fragments of a drum part
// Templates write into a shared PatternBuilder; the Composer orders them

pub mod accents;
pub mod builder;
pub mod composer;
pub mod groove;
pub mod texture;

use serde::{Deserialize, Serialize};

use crate::config::unit;
use crate::rng::StageRng;

pub use accents::{CrashAccents, FillDirection, TomFill};
pub use builder::PatternBuilder;
pub use composer::{basic_rock, metal, Composer};
pub use groove::{BasicGroove, BlastBeat, BlastStyle, DoubleBassPedal, PedalStyle};
pub use texture::{FunkGhostNotes, JazzRidePattern, RideAccent};

/// Shared inputs every template reads while building
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildContext {
    /// Number of bars to generate (at least 1)
    pub bars: u32,

    /// How busy the part is [0.0, 1.0]
    pub complexity: f32,

    /// How hard the part is played [0.0, 1.0]
    pub dynamics: f32,

    /// Probability a non-final bar receives a fill [0.0, 1.0]
    pub fill_frequency: f32,
}

impl BuildContext {
    /// Context with mid dynamics and a fill in every bar
    pub fn new(bars: u32, complexity: f32) -> Self {
        BuildContext {
            bars,
            complexity,
            dynamics: 0.5,
            fill_frequency: 1.0,
        }
        .normalized()
    }

    /// Clamp bars to at least 1 and every control into [0, 1]
    pub fn normalized(self) -> Self {
        BuildContext {
            bars: self.bars.max(1),
            complexity: unit(self.complexity),
            dynamics: unit(self.dynamics),
            fill_frequency: unit(self.fill_frequency),
        }
    }
}

/// Closed set of pattern templates, each carrying its own parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "template", rename_all = "snake_case")]
pub enum Template {
    BasicGroove(BasicGroove),
    DoubleBassPedal(DoubleBassPedal),
    BlastBeat(BlastBeat),
    JazzRide(JazzRidePattern),
    FunkGhostNotes(FunkGhostNotes),
    CrashAccents(CrashAccents),
    TomFill(TomFill),
}

impl Template {
    /// Stable snake_case names, in registry order
    pub const NAMES: [&'static str; 7] = [
        "basic_groove",
        "double_bass_pedal",
        "blast_beat",
        "jazz_ride",
        "funk_ghost_notes",
        "crash_accents",
        "tom_fill",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Template::BasicGroove(_) => "basic_groove",
            Template::DoubleBassPedal(_) => "double_bass_pedal",
            Template::BlastBeat(_) => "blast_beat",
            Template::JazzRide(_) => "jazz_ride",
            Template::FunkGhostNotes(_) => "funk_ghost_notes",
            Template::CrashAccents(_) => "crash_accents",
            Template::TomFill(_) => "tom_fill",
        }
    }

    /// Template with default parameters by name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "basic_groove" => Some(Template::BasicGroove(BasicGroove::default())),
            "double_bass_pedal" => Some(Template::DoubleBassPedal(DoubleBassPedal::default())),
            "blast_beat" => Some(Template::BlastBeat(BlastBeat::default())),
            "jazz_ride" => Some(Template::JazzRide(JazzRidePattern::default())),
            "funk_ghost_notes" => Some(Template::FunkGhostNotes(FunkGhostNotes::default())),
            "crash_accents" => Some(Template::CrashAccents(CrashAccents::default())),
            "tom_fill" => Some(Template::TomFill(TomFill::default())),
            _ => None,
        }
    }

    /// Contribute this template's beats for every bar of the context
    pub fn generate(&self, builder: &mut PatternBuilder, ctx: &BuildContext, rng: &mut StageRng) {
        let ctx = ctx.normalized();
        match self {
            Template::BasicGroove(t) => t.generate(builder, &ctx),
            Template::DoubleBassPedal(t) => t.generate(builder, &ctx),
            Template::BlastBeat(t) => t.generate(builder, &ctx),
            Template::JazzRide(t) => t.generate(builder, &ctx),
            Template::FunkGhostNotes(t) => t.generate(builder, &ctx, rng),
            Template::CrashAccents(t) => t.generate(builder, &ctx),
            Template::TomFill(t) => t.generate(builder, &ctx, rng),
        }
    }
}
