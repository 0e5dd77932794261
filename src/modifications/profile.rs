// Drummer Profiles - Named chains of modifications
// Folding a pattern through each step in order gives a drummer's signature feel

use serde::{Deserialize, Serialize};

use super::{
    BehindBeatTiming, FastChopsTriplets, Fallback, GhostNoteLayer, HeavyAccents, LinearCoordination,
    MechanicalPrecision, MinimalCreativity, Modification, PocketStretching, ShuffleFeel,
    SpeedPrecision, TripletVocabulary, TwistedAccents,
};
use crate::model::{Pattern, VoiceClass};
use crate::rng;

/// One (modification, intensity) pair of a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileStep {
    pub modification: Modification,
    pub intensity: f32,
}

/// Named, ordered modification chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrummerProfile {
    pub name: String,
    pub steps: Vec<ProfileStep>,
}

/// Result of applying a profile
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileReport {
    pub pattern: Pattern,

    /// Steps whose output was discarded by the empty-result guard
    pub fallbacks: Vec<Fallback>,
}

impl DrummerProfile {
    /// Built-in profile names
    pub const BUILT_IN: [&'static str; 7] = ["bonham", "chambers", "dee", "hoglan", "porcaro", "roeder", "weckl"];

    pub fn new(name: impl Into<String>) -> Self {
        DrummerProfile {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    pub fn step(mut self, modification: Modification, intensity: f32) -> Self {
        self.steps.push(ProfileStep {
            modification,
            intensity,
        });
        self
    }

    /// Fold the pattern through every step; each step draws from its own generator
    pub fn apply(&self, pattern: &Pattern, seed: u64) -> ProfileReport {
        let mut current = pattern.clone();
        let mut fallbacks = Vec::new();

        for (index, step) in self.steps.iter().enumerate() {
            let mut step_rng = rng::derive(seed, index as u64);
            let outcome = step.modification.apply(&current, step.intensity, &mut step_rng);
            if let Some(fallback) = outcome.fallback {
                fallbacks.push(fallback);
            }
            current = outcome.pattern;
        }

        log::info!(
            "Applied drummer profile {} ({} steps): {} -> {} beats",
            self.name,
            self.steps.len(),
            pattern.len(),
            current.len()
        );

        ProfileReport {
            pattern: current.with_metadata("drummer", self.name.clone()),
            fallbacks,
        }
    }

    /// Look up a built-in profile
    pub fn built_in(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "bonham" => Some(Self::bonham()),
            "chambers" => Some(Self::chambers()),
            "dee" => Some(Self::dee()),
            "hoglan" => Some(Self::hoglan()),
            "porcaro" => Some(Self::porcaro()),
            "roeder" => Some(Self::roeder()),
            "weckl" => Some(Self::weckl()),
            _ => None,
        }
    }

    /// Laid-back snare, triplet fills, big accents
    pub fn bonham() -> Self {
        DrummerProfile::new("bonham")
            .step(behind_beat(25.0), 0.7)
            .step(
                Modification::TripletVocabulary(TripletVocabulary {
                    probability: 0.4,
                    ..Default::default()
                }),
                0.8,
            )
            .step(Modification::HeavyAccents(HeavyAccents { accent_boost: 15 }), 0.9)
    }

    /// Gospel chops over a deep pocket
    pub fn chambers() -> Self {
        DrummerProfile::new("chambers")
            .step(behind_beat(15.0), 0.6)
            .step(Modification::GhostNoteLayer(GhostNoteLayer { density: 0.7 }), 0.8)
            .step(Modification::FastChopsTriplets(FastChopsTriplets::default()), 0.7)
            .step(
                Modification::PocketStretching(PocketStretching {
                    variation_ms: 10.0,
                    ..Default::default()
                }),
                0.5,
            )
    }

    /// Speed with even dynamics and displaced accents
    pub fn dee() -> Self {
        DrummerProfile::new("dee")
            .step(Modification::SpeedPrecision(SpeedPrecision::default()), 0.9)
            .step(Modification::TwistedAccents(TwistedAccents { displacement: 0.5 }), 0.7)
    }

    /// Machine-tight grid and heavy accents
    pub fn hoglan() -> Self {
        DrummerProfile::new("hoglan")
            .step(
                Modification::MechanicalPrecision(MechanicalPrecision { quantize_amount: 0.95 }),
                1.0,
            )
            .step(Modification::HeavyAccents(HeavyAccents { accent_boost: 25 }), 0.9)
    }

    /// Half-time shuffle with ghost notes
    pub fn porcaro() -> Self {
        DrummerProfile::new("porcaro")
            .step(Modification::ShuffleFeel(ShuffleFeel { shuffle_amount: 0.33 }), 0.8)
            .step(Modification::GhostNoteLayer(GhostNoteLayer { density: 0.6 }), 0.7)
    }

    /// Sparse sludge: thin cymbals, hard hits
    pub fn roeder() -> Self {
        DrummerProfile::new("roeder")
            .step(Modification::MinimalCreativity(MinimalCreativity { sparseness: 0.4 }), 0.8)
            .step(Modification::HeavyAccents(HeavyAccents { accent_boost: 20 }), 1.0)
    }

    /// Linear phrasing with light ghost notes
    pub fn weckl() -> Self {
        DrummerProfile::new("weckl")
            .step(Modification::LinearCoordination(LinearCoordination::default()), 0.9)
            .step(Modification::GhostNoteLayer(GhostNoteLayer { density: 0.5 }), 0.6)
    }
}

fn behind_beat(max_delay_ms: f64) -> Modification {
    Modification::BehindBeatTiming(BehindBeatTiming {
        max_delay_ms,
        target: VoiceClass::Snare,
        ..Default::default()
    })
}
