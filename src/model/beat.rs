// Beat - A single percussion onset
// Validated at construction; invalid beats never exist

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::instrument::Instrument;

/// Default note length in beats (a sixteenth)
pub const DEFAULT_DURATION: f64 = 0.25;

/// Errors raised when constructing a beat with out-of-range values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BeatError {
    #[error("Velocity must be 0-127, got {0}")]
    InvalidVelocity(i32),

    #[error("Position must be finite and non-negative, got {0}")]
    InvalidPosition(f64),

    #[error("Duration must be finite and positive, got {0}")]
    InvalidDuration(f64),
}

/// A single drum hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BeatFields")]
pub struct Beat {
    /// Position in quarter-note beats from the start of the pattern
    position: f64,

    instrument: Instrument,

    /// MIDI velocity (0-127)
    velocity: u8,

    /// Note length in beats
    duration: f64,

    /// Quiet texture note
    ghost_note: bool,

    /// Emphasized note
    accent: bool,
}

/// Unvalidated wire form of a beat
#[derive(Debug, Clone, Deserialize)]
struct BeatFields {
    position: f64,
    instrument: Instrument,
    velocity: i32,
    #[serde(default = "default_duration")]
    duration: f64,
    #[serde(default)]
    ghost_note: bool,
    #[serde(default)]
    accent: bool,
}

fn default_duration() -> f64 {
    DEFAULT_DURATION
}

impl TryFrom<BeatFields> for Beat {
    type Error = BeatError;

    fn try_from(fields: BeatFields) -> Result<Self, Self::Error> {
        Ok(Beat::new(fields.position, fields.instrument, fields.velocity)?
            .with_duration(fields.duration)?
            .with_ghost(fields.ghost_note)
            .with_accent(fields.accent))
    }
}

impl Beat {
    /// Create a beat, rejecting out-of-range velocity or position
    pub fn new(position: f64, instrument: Instrument, velocity: i32) -> Result<Self, BeatError> {
        if !(0..=127).contains(&velocity) {
            return Err(BeatError::InvalidVelocity(velocity));
        }
        if !position.is_finite() || position < 0.0 {
            return Err(BeatError::InvalidPosition(position));
        }

        Ok(Beat {
            position,
            instrument,
            velocity: velocity as u8,
            duration: DEFAULT_DURATION,
            ghost_note: false,
            accent: false,
        })
    }

    /// Crate-internal constructor for values already known to be in range
    pub(crate) fn clamped(position: f64, instrument: Instrument, velocity: i32) -> Self {
        Beat {
            position: sanitize_position(position),
            instrument,
            velocity: clamp_velocity(velocity),
            duration: DEFAULT_DURATION,
            ghost_note: false,
            accent: false,
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn instrument(&self) -> Instrument {
        self.instrument
    }

    pub fn velocity(&self) -> u8 {
        self.velocity
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_ghost(&self) -> bool {
        self.ghost_note
    }

    pub fn is_accent(&self) -> bool {
        self.accent
    }

    /// Set the note length, rejecting non-positive values
    pub fn with_duration(mut self, duration: f64) -> Result<Self, BeatError> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(BeatError::InvalidDuration(duration));
        }
        self.duration = duration;
        Ok(self)
    }

    pub fn with_ghost(mut self, ghost_note: bool) -> Self {
        self.ghost_note = ghost_note;
        self
    }

    pub fn with_accent(mut self, accent: bool) -> Self {
        self.accent = accent;
        self
    }

    /// Move the beat; the result is clamped to be non-negative
    pub fn with_position(mut self, position: f64) -> Self {
        if position.is_finite() {
            self.position = position.max(0.0);
        }
        self
    }

    /// Shift by a signed offset in beats, clamped at zero
    pub fn shifted(self, offset: f64) -> Self {
        let position = self.position + offset;
        self.with_position(position)
    }

    /// Replace the velocity, clamped to 0-127
    pub fn with_velocity(mut self, velocity: i32) -> Self {
        self.velocity = clamp_velocity(velocity);
        self
    }

    pub fn with_instrument(mut self, instrument: Instrument) -> Self {
        self.instrument = instrument;
        self
    }
}

/// Clamp an arbitrary integer into the MIDI velocity range
pub fn clamp_velocity(velocity: i32) -> u8 {
    velocity.clamp(0, 127) as u8
}

fn sanitize_position(position: f64) -> f64 {
    if position.is_finite() {
        position.max(0.0)
    } else {
        0.0
    }
}
