// Modification Engine - Composable drummer-style transforms
// Every modification is a pure Pattern -> Pattern function scaled by intensity

pub mod accents;
pub mod coordination;
pub mod profile;
pub mod timing;
pub mod vocabulary;

use serde::{Deserialize, Serialize};

use crate::config::unit;
use crate::model::Pattern;
use crate::rng::StageRng;

pub use accents::{HeavyAccents, SpeedPrecision, TwistedAccents};
pub use coordination::{LinearCoordination, MinimalCreativity};
pub use profile::{DrummerProfile, ProfileReport, ProfileStep};
pub use timing::{BehindBeatTiming, MechanicalPrecision, PocketStretching, ShuffleFeel};
pub use vocabulary::{BarOverflow, FastChopsTriplets, GhostNoteLayer, TripletVocabulary};

/// Closed set of modifications, each carrying its own parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "modification", rename_all = "snake_case")]
pub enum Modification {
    BehindBeatTiming(BehindBeatTiming),
    TripletVocabulary(TripletVocabulary),
    GhostNoteLayer(GhostNoteLayer),
    LinearCoordination(LinearCoordination),
    HeavyAccents(HeavyAccents),
    ShuffleFeel(ShuffleFeel),
    FastChopsTriplets(FastChopsTriplets),
    PocketStretching(PocketStretching),
    MinimalCreativity(MinimalCreativity),
    SpeedPrecision(SpeedPrecision),
    TwistedAccents(TwistedAccents),
    MechanicalPrecision(MechanicalPrecision),
}

/// Record of the empty-result guard returning a stage's input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fallback {
    /// Stage whose output was discarded
    pub stage: String,

    /// Beats in the pattern that was passed through instead
    pub input_beats: usize,
}

/// Result of applying one modification
#[derive(Debug, Clone, PartialEq)]
pub struct ModificationOutcome {
    pub pattern: Pattern,

    /// Set when the modification emptied a non-empty pattern
    pub fallback: Option<Fallback>,
}

impl ModificationOutcome {
    pub fn into_pattern(self) -> Pattern {
        self.pattern
    }

    pub fn fell_back(&self) -> bool {
        self.fallback.is_some()
    }
}

impl Modification {
    /// Stable snake_case names, in registry order
    pub const NAMES: [&'static str; 12] = [
        "behind_beat_timing",
        "triplet_vocabulary",
        "ghost_note_layer",
        "linear_coordination",
        "heavy_accents",
        "shuffle_feel",
        "fast_chops_triplets",
        "pocket_stretching",
        "minimal_creativity",
        "speed_precision",
        "twisted_accents",
        "mechanical_precision",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Modification::BehindBeatTiming(_) => "behind_beat_timing",
            Modification::TripletVocabulary(_) => "triplet_vocabulary",
            Modification::GhostNoteLayer(_) => "ghost_note_layer",
            Modification::LinearCoordination(_) => "linear_coordination",
            Modification::HeavyAccents(_) => "heavy_accents",
            Modification::ShuffleFeel(_) => "shuffle_feel",
            Modification::FastChopsTriplets(_) => "fast_chops_triplets",
            Modification::PocketStretching(_) => "pocket_stretching",
            Modification::MinimalCreativity(_) => "minimal_creativity",
            Modification::SpeedPrecision(_) => "speed_precision",
            Modification::TwistedAccents(_) => "twisted_accents",
            Modification::MechanicalPrecision(_) => "mechanical_precision",
        }
    }

    /// Modification with default parameters by name
    pub fn from_name(name: &str) -> Option<Self> {
        let modification = match name.to_lowercase().as_str() {
            "behind_beat_timing" => Modification::BehindBeatTiming(BehindBeatTiming::default()),
            "triplet_vocabulary" => Modification::TripletVocabulary(TripletVocabulary::default()),
            "ghost_note_layer" => Modification::GhostNoteLayer(GhostNoteLayer::default()),
            "linear_coordination" => Modification::LinearCoordination(LinearCoordination::default()),
            "heavy_accents" => Modification::HeavyAccents(HeavyAccents::default()),
            "shuffle_feel" => Modification::ShuffleFeel(ShuffleFeel::default()),
            "fast_chops_triplets" => Modification::FastChopsTriplets(FastChopsTriplets::default()),
            "pocket_stretching" => Modification::PocketStretching(PocketStretching::default()),
            "minimal_creativity" => Modification::MinimalCreativity(MinimalCreativity::default()),
            "speed_precision" => Modification::SpeedPrecision(SpeedPrecision::default()),
            "twisted_accents" => Modification::TwistedAccents(TwistedAccents::default()),
            "mechanical_precision" => Modification::MechanicalPrecision(MechanicalPrecision::default()),
            _ => return None,
        };
        Some(modification)
    }

    /// Apply at `intensity` (clamped to [0, 1]) drawing from `rng`
    ///
    /// An empty input passes through untouched. If the result would be empty
    /// while the input was not, the input is returned and the fallback recorded.
    pub fn apply(&self, pattern: &Pattern, intensity: f32, rng: &mut StageRng) -> ModificationOutcome {
        let intensity = unit(intensity) as f64;

        if pattern.is_empty() {
            log::warn!("Modification {} received empty pattern {}; passing it through", self.name(), pattern.name);
            return ModificationOutcome {
                pattern: pattern.clone(),
                fallback: None,
            };
        }

        let output = match self {
            Modification::BehindBeatTiming(m) => m.apply(pattern, intensity),
            Modification::TripletVocabulary(m) => m.apply(pattern, intensity, rng),
            Modification::GhostNoteLayer(m) => m.apply(pattern, intensity, rng),
            Modification::LinearCoordination(m) => m.apply(pattern, intensity, rng),
            Modification::HeavyAccents(m) => m.apply(pattern, intensity),
            Modification::ShuffleFeel(m) => m.apply(pattern, intensity),
            Modification::FastChopsTriplets(m) => m.apply(pattern, intensity, rng),
            Modification::PocketStretching(m) => m.apply(pattern, intensity, rng),
            Modification::MinimalCreativity(m) => m.apply(pattern, intensity, rng),
            Modification::SpeedPrecision(m) => m.apply(pattern, intensity),
            Modification::TwistedAccents(m) => m.apply(pattern, intensity, rng),
            Modification::MechanicalPrecision(m) => m.apply(pattern, intensity),
        };

        if output.is_empty() && !pattern.is_empty() {
            log::warn!(
                "Modification {} emptied pattern {} ({} beats); keeping input",
                self.name(),
                pattern.name,
                pattern.len()
            );
            return ModificationOutcome {
                pattern: pattern.clone(),
                fallback: Some(Fallback {
                    stage: self.name().to_string(),
                    input_beats: pattern.len(),
                }),
            };
        }

        log::debug!(
            "Modification {} at {:.2}: {} -> {} beats",
            self.name(),
            intensity,
            pattern.len(),
            output.len()
        );

        ModificationOutcome {
            pattern: output.with_metadata("modification", self.name()),
            fallback: None,
        }
    }
}
