// Vocabulary Modifications - Triplet fills, snare chops and ghost-note layers
// Insert new onsets into fill windows or free sixteenth slots

use serde::{Deserialize, Serialize};

use crate::config::{note, velocity, SIMULTANEITY_TOLERANCE_BEATS};
use crate::model::{Beat, Instrument, Pattern};
use crate::rng::{chance, StageRng};

/// What happens to inserted notes that would cross the end of their bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarOverflow {
    /// Notes at or past the bar line are left out
    #[default]
    Drop,
    /// The run is squeezed so every note lands inside the window
    Compress,
}

/// One inserted note of a fill run
struct RunNote {
    instrument: Instrument,
    velocity: i32,
    accent: bool,
}

/// Lay a run of notes out from `start`, never reaching `bar_end`
fn place_run(run: &[RunNote], start: f64, spacing: f64, bar_end: f64, overflow: BarOverflow) -> Vec<Beat> {
    let window = bar_end - start;
    if window <= 0.0 || run.is_empty() {
        return Vec::new();
    }

    let spacing = match overflow {
        BarOverflow::Drop => spacing,
        BarOverflow::Compress => spacing.min(window / run.len() as f64),
    };

    run.iter()
        .enumerate()
        .map(|(i, n)| (start + i as f64 * spacing, n))
        .take_while(|(pos, _)| *pos < bar_end - 1e-9)
        .map(|(pos, n)| {
            let beat = Beat::clamped(pos, n.instrument, n.velocity).with_accent(n.accent);
            // spacing is always positive here
            beat.clone().with_duration(spacing).unwrap_or(beat)
        })
        .collect()
}

/// Rolling sixteenth-triplet tom fills over the last half beat of a bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripletVocabulary {
    /// Chance per bar at full intensity
    pub probability: f64,

    pub overflow: BarOverflow,
}

impl Default for TripletVocabulary {
    fn default() -> Self {
        TripletVocabulary {
            probability: 0.3,
            overflow: BarOverflow::Drop,
        }
    }
}

impl TripletVocabulary {
    /// Fill window length before the bar line
    pub const WINDOW: f64 = 0.5;

    pub fn apply(&self, pattern: &Pattern, intensity: f64, rng: &mut StageRng) -> Pattern {
        let ts = pattern.time_signature;
        let run: Vec<RunNote> = [
            Instrument::MidTom,
            Instrument::MidTom,
            Instrument::FloorTom,
            Instrument::FloorTom,
            Instrument::FloorTom,
            Instrument::Kick,
        ]
        .into_iter()
        .enumerate()
        .map(|(i, instrument)| RunNote {
            instrument,
            velocity: velocity::TOM_HEAVY,
            accent: i % 3 == 0,
        })
        .collect();

        let mut beats = pattern.beats().to_vec();
        for bar in pattern.occupied_bars() {
            if !chance(rng, self.probability * intensity) {
                continue;
            }

            let bar_end = ts.bar_end(bar);
            let start = (bar_end - Self::WINDOW).max(ts.bar_start(bar));

            // The fill replaces whatever was in its window
            beats.retain(|b| !(b.position() >= start && b.position() < bar_end));
            beats.extend(place_run(&run, start, note::SIXTEENTH_TRIPLET, bar_end, self.overflow));
        }

        pattern.derive("triplets", beats)
    }
}

/// Fast sixteenth-triplet snare chops from the "and" of beat three
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FastChopsTriplets {
    pub probability: f64,
    pub overflow: BarOverflow,
}

impl Default for FastChopsTriplets {
    fn default() -> Self {
        FastChopsTriplets {
            probability: 0.25,
            overflow: BarOverflow::Drop,
        }
    }
}

impl FastChopsTriplets {
    /// Offset of the first chop within the bar
    pub const START: f64 = 2.5;

    pub fn apply(&self, pattern: &Pattern, intensity: f64, rng: &mut StageRng) -> Pattern {
        let ts = pattern.time_signature;
        let run: Vec<RunNote> = (0..6)
            .map(|i| RunNote {
                instrument: Instrument::Snare,
                velocity: if i % 2 == 0 {
                    velocity::SNARE_HEAVY
                } else {
                    velocity::SNARE_NORMAL
                },
                accent: i == 0,
            })
            .collect();

        let mut beats = pattern.beats().to_vec();
        for bar in pattern.occupied_bars() {
            if !chance(rng, self.probability * intensity) {
                continue;
            }

            let start = ts.bar_start(bar) + Self::START;
            beats.extend(place_run(&run, start, note::SIXTEENTH_TRIPLET, ts.bar_end(bar), self.overflow));
        }

        pattern.derive("fast_chops", beats)
    }
}

/// Ghost snares on free sixteenth slots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GhostNoteLayer {
    /// Chance per free slot at full intensity
    pub density: f64,
}

impl Default for GhostNoteLayer {
    fn default() -> Self {
        GhostNoteLayer { density: 0.6 }
    }
}

impl GhostNoteLayer {
    pub fn apply(&self, pattern: &Pattern, intensity: f64, rng: &mut StageRng) -> Pattern {
        let ts = pattern.time_signature;
        let slots_per_bar = (ts.beats_per_bar() / note::SIXTEENTH).round() as u32;

        let source = pattern.beats();
        let mut beats = source.to_vec();
        // Slots and beats both ascend, so one cursor walks the sorted beats once
        let mut cursor = 0;
        for bar in pattern.occupied_bars() {
            for slot in 0..slots_per_bar {
                let pos = ts.bar_start(bar) + slot as f64 * note::SIXTEENTH;

                while cursor < source.len() && pos - source[cursor].position() > SIMULTANEITY_TOLERANCE_BEATS {
                    cursor += 1;
                }
                let occupied = source[cursor..]
                    .iter()
                    .take_while(|b| b.position() - pos <= SIMULTANEITY_TOLERANCE_BEATS)
                    .any(|b| !b.is_ghost() || b.instrument() == Instrument::Snare);
                if occupied {
                    continue;
                }

                if chance(rng, self.density * intensity) {
                    let ghost = Beat::clamped(pos, Instrument::Snare, velocity::SNARE_GHOST).with_ghost(true);
                    beats.push(ghost);
                }
            }
        }

        pattern.derive("ghost_notes", beats)
    }
}
