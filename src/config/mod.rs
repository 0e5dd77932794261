// Configuration - Named constants, voice priority and upstream parameters

pub mod constants;
pub mod params;
pub mod priority;

pub use constants::{
    ms_to_beats, note, unit, velocity, GRID_EPSILON, SIMULTANEITY_TOLERANCE_BEATS, TEMPO_DEFAULT,
    TEMPO_MAX, TEMPO_MIN,
};
pub use params::{ConfigError, GenerationParameters};
pub use priority::VoicePriority;
