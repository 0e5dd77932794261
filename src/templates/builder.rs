// Pattern Builder - Mutable accumulator shared by the templates of one composer
// Templates only add; build() sorts and freezes the result into a Pattern

use crate::config::GRID_EPSILON;
use crate::model::{Beat, Instrument, Pattern, TimeSignature};

/// Accumulates beats bar by bar before freezing them into a Pattern
#[derive(Debug, Clone)]
pub struct PatternBuilder {
    name: String,
    time_signature: TimeSignature,
    swing_ratio: f64,
    beats: Vec<Beat>,
}

impl PatternBuilder {
    pub fn new(name: impl Into<String>, time_signature: TimeSignature) -> Self {
        PatternBuilder {
            name: name.into(),
            time_signature,
            swing_ratio: 0.0,
            beats: Vec::new(),
        }
    }

    pub fn beats_per_bar(&self) -> f64 {
        self.time_signature.beats_per_bar()
    }

    pub fn time_signature(&self) -> TimeSignature {
        self.time_signature
    }

    pub fn len(&self) -> usize {
        self.beats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beats.is_empty()
    }

    /// Raise the swing ratio carried into the built pattern (never lowers it)
    pub fn swing(&mut self, swing_ratio: f64) -> &mut Self {
        if swing_ratio.is_finite() {
            self.swing_ratio = self.swing_ratio.max(swing_ratio.clamp(0.0, 1.0));
        }
        self
    }

    /// Add a hit at a position relative to the start of `bar`
    ///
    /// Positions outside [0, beats_per_bar) are skipped and velocities are
    /// clamped into [1, 127]. Returns whether the hit was written.
    pub fn hit(&mut self, bar: u32, offset: f64, instrument: Instrument, velocity: i32) -> bool {
        self.push(bar, offset, instrument, velocity, false)
    }

    /// Add a ghost-flagged hit; same bounds as `hit`
    pub fn ghost(&mut self, bar: u32, offset: f64, instrument: Instrument, velocity: i32) -> bool {
        self.push(bar, offset, instrument, velocity, true)
    }

    fn push(&mut self, bar: u32, offset: f64, instrument: Instrument, velocity: i32, ghost: bool) -> bool {
        if !offset.is_finite() || offset < 0.0 || offset >= self.beats_per_bar() - GRID_EPSILON / 2.0 {
            return false;
        }

        let position = self.time_signature.bar_start(bar) + offset;
        let beat = Beat::clamped(position, instrument, velocity.clamp(1, 127)).with_ghost(ghost);
        self.beats.push(beat);
        true
    }

    /// Freeze into an immutable, position-sorted Pattern
    pub fn build(self) -> Pattern {
        Pattern::from_beats(self.name, self.time_signature, self.beats).with_swing_ratio(self.swing_ratio)
    }
}

/// Number of evenly spaced slots of `step` beats that fit in `length` beats
pub fn slots(length: f64, step: f64) -> u32 {
    if !(step > 0.0) || !length.is_finite() {
        return 0;
    }
    ((length + GRID_EPSILON / 2.0) / step).floor().max(0.0) as u32
}
