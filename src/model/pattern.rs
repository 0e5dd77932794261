// Pattern - An ordered, immutable collection of beats
// Every pipeline stage reads one pattern and returns a new one

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::beat::Beat;
use super::cluster::{group_clusters, Cluster};
use super::instrument::Instrument;
use super::time::TimeSignature;

/// Default grid resolution (16th notes)
pub const DEFAULT_SUBDIVISION: u32 = 16;

/// Complete drum pattern with timing and metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    /// Pattern name / identifier
    pub name: String,

    /// Beats, always sorted ascending by position
    #[serde(deserialize_with = "deserialize_sorted")]
    beats: Vec<Beat>,

    pub time_signature: TimeSignature,

    /// Grid resolution in notes per whole note (16 = sixteenth grid)
    pub subdivision: u32,

    /// Swing ratio [0.0, 1.0]; 0.0 = straight, 0.33 = triplet feel
    pub swing_ratio: f64,

    /// Opaque caller/stage metadata
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Pattern {
    /// Create an empty 4/4 pattern
    pub fn new(name: impl Into<String>) -> Self {
        Pattern {
            name: name.into(),
            beats: Vec::new(),
            time_signature: TimeSignature::default(),
            subdivision: DEFAULT_SUBDIVISION,
            swing_ratio: 0.0,
            metadata: BTreeMap::new(),
        }
    }

    /// Create a pattern from beats in any order
    pub fn from_beats(name: impl Into<String>, time_signature: TimeSignature, beats: Vec<Beat>) -> Self {
        let mut pattern = Pattern::new(name);
        pattern.time_signature = time_signature;
        pattern.beats = sorted(beats);
        pattern
    }

    pub fn beats(&self) -> &[Beat] {
        &self.beats
    }

    pub fn len(&self) -> usize {
        self.beats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beats.is_empty()
    }

    /// New pattern with the same header and a replacement beat list
    pub fn with_beats(&self, beats: Vec<Beat>) -> Pattern {
        Pattern {
            name: self.name.clone(),
            beats: sorted(beats),
            time_signature: self.time_signature,
            subdivision: self.subdivision,
            swing_ratio: self.swing_ratio,
            metadata: self.metadata.clone(),
        }
    }

    /// New pattern derived by a named stage: `{name}_{suffix}` with the stage recorded
    pub fn derive(&self, suffix: &str, beats: Vec<Beat>) -> Pattern {
        let mut pattern = self.with_beats(beats);
        pattern.name = format!("{}_{}", self.name, suffix);
        pattern
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_swing_ratio(mut self, swing_ratio: f64) -> Self {
        self.swing_ratio = if swing_ratio.is_finite() {
            swing_ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }

    /// All beats within `tolerance` of a position
    pub fn beats_at(&self, position: f64, tolerance: f64) -> Vec<&Beat> {
        self.beats
            .iter()
            .filter(|b| (b.position() - position).abs() <= tolerance)
            .collect()
    }

    /// All beats for one instrument
    pub fn beats_for(&self, instrument: Instrument) -> Vec<&Beat> {
        self.beats
            .iter()
            .filter(|b| b.instrument() == instrument)
            .collect()
    }

    /// Number of bars needed to contain the last onset (at least 1)
    pub fn bar_count(&self) -> u32 {
        match self.beats.last() {
            Some(last) => self.time_signature.bar_of(last.position()).saturating_add(1),
            None => 1,
        }
    }

    /// Distinct bars holding at least one onset, ascending
    pub fn occupied_bars(&self) -> Vec<u32> {
        let mut bars: Vec<u32> = self
            .beats
            .iter()
            .map(|b| self.time_signature.bar_of(b.position()))
            .collect();
        bars.dedup();
        bars
    }

    /// Pattern length in beats, rounded up to whole bars
    pub fn length_beats(&self) -> f64 {
        self.bar_count() as f64 * self.time_signature.beats_per_bar()
    }

    /// Simultaneity clusters with indices into `beats()`
    pub fn clusters(&self, tolerance: f64) -> Vec<Cluster> {
        group_clusters(&self.beats, tolerance)
    }

    /// Check the guarantees handed to downstream serializers:
    /// sorted, non-negative positions, velocities 0-127, positive durations
    pub fn is_export_ready(&self) -> bool {
        let sorted = self
            .beats
            .windows(2)
            .all(|w| w[0].position() <= w[1].position());

        sorted
            && self.beats.iter().all(|b| {
                b.position() >= 0.0 && b.velocity() <= 127 && b.duration() > 0.0
            })
    }
}

/// Stable sort by position; equal positions keep insertion order
fn sorted(mut beats: Vec<Beat>) -> Vec<Beat> {
    beats.sort_by(|a, b| a.position().total_cmp(&b.position()));
    beats
}

fn deserialize_sorted<'de, D>(deserializer: D) -> Result<Vec<Beat>, D::Error>
where
    D: Deserializer<'de>,
{
    let beats = Vec::<Beat>::deserialize(deserializer)?;
    Ok(sorted(beats))
}
