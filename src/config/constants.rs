// Named Constants - Velocities, note values and defaults
// Single source for numbers that templates and modifications share

/// MIDI velocities by voice and dynamic level
pub mod velocity {
    pub const KICK_WHISPER: i32 = 60;
    pub const KICK_LIGHT: i32 = 95;
    pub const KICK_NORMAL: i32 = 110;
    pub const KICK_HEAVY: i32 = 120;

    pub const SNARE_GHOST: i32 = 40;
    pub const SNARE_LIGHT: i32 = 90;
    pub const SNARE_NORMAL: i32 = 115;
    pub const SNARE_HEAVY: i32 = 127;

    pub const HIHAT_LIGHT: i32 = 60;
    pub const HIHAT_NORMAL: i32 = 80;
    pub const HIHAT_OPEN: i32 = 100;
    pub const HIHAT_PEDAL: i32 = 70;

    pub const RIDE_LIGHT: i32 = 70;
    pub const RIDE_NORMAL: i32 = 90;
    pub const RIDE_ACCENT: i32 = 105;
    pub const RIDE_BELL: i32 = 100;

    pub const CRASH_NORMAL: i32 = 110;
    pub const CHINA_NORMAL: i32 = 105;

    pub const TOM_NORMAL: i32 = 100;
    pub const TOM_HEAVY: i32 = 115;

    /// Floor for ghost notes after accent shaping
    pub const GHOST_FLOOR: i32 = 20;
}

/// Note values in quarter-note beats
pub mod note {
    pub const WHOLE: f64 = 4.0;
    pub const HALF: f64 = 2.0;
    pub const QUARTER: f64 = 1.0;
    pub const EIGHTH: f64 = 0.5;
    pub const SIXTEENTH: f64 = 0.25;
    pub const THIRTY_SECOND: f64 = 0.125;
    pub const EIGHTH_TRIPLET: f64 = 1.0 / 3.0;
    pub const SIXTEENTH_TRIPLET: f64 = 1.0 / 6.0;
}

/// Tempo bounds (BPM)
pub const TEMPO_MIN: f64 = 20.0;
pub const TEMPO_MAX: f64 = 400.0;
pub const TEMPO_DEFAULT: f64 = 120.0;

/// Bar count bounds
pub const BARS_MIN: u32 = 1;
pub const BARS_MAX: u32 = 256;

/// Window (in beats) inside which onsets count as simultaneous.
/// Heuristic: a little under a 64th note; may need empirical tuning.
pub const SIMULTANEITY_TOLERANCE_BEATS: f64 = 0.02;

/// Tolerance for "is this position on a grid line" checks
pub const GRID_EPSILON: f64 = 0.01;

/// Clamp a unit-interval control, mapping NaN to zero
pub fn unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Milliseconds to beats at a tempo
pub fn ms_to_beats(ms: f64, tempo: f64) -> f64 {
    ms / (60000.0 / tempo)
}
