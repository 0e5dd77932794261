// Data Model - Beats, patterns, kit voices and time signatures
// Value types shared by every pipeline stage

pub mod beat;
pub mod cluster;
pub mod instrument;
pub mod pattern;
pub mod time;

pub use beat::{clamp_velocity, Beat, BeatError, DEFAULT_DURATION};
pub use cluster::{group_clusters, Cluster};
pub use instrument::{Instrument, LimbClass, VoiceClass};
pub use pattern::{Pattern, DEFAULT_SUBDIVISION};
pub use time::{TimeSignature, TimeSignatureError};
