// Voice Priority - Which onset survives when a cluster must be thinned
// Used by linear coordination and the hand-limit fixer

use serde::{Deserialize, Serialize};

use crate::model::{Beat, VoiceClass};

/// Ordered voice classes, most important first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoicePriority {
    pub order: Vec<VoiceClass>,
}

impl Default for VoicePriority {
    /// snare > kick > cymbal > tom > hand hi-hat > pedal hi-hat
    fn default() -> Self {
        VoicePriority {
            order: vec![
                VoiceClass::Snare,
                VoiceClass::Kick,
                VoiceClass::Cymbal,
                VoiceClass::Tom,
                VoiceClass::HandHiHat,
                VoiceClass::PedalHiHat,
            ],
        }
    }
}

impl VoicePriority {
    /// Rank of a voice class; higher wins. Unlisted classes rank lowest.
    pub fn rank(&self, class: VoiceClass) -> usize {
        self.order
            .iter()
            .position(|&c| c == class)
            .map(|idx| self.order.len() - idx)
            .unwrap_or(0)
    }

    pub fn rank_beat(&self, beat: &Beat) -> usize {
        self.rank(beat.instrument().voice_class())
    }

    /// Index of the single beat to keep: highest rank, then loudest, then earliest
    pub fn strongest(&self, beats: &[&Beat]) -> Option<usize> {
        beats
            .iter()
            .enumerate()
            .max_by(|(ia, a), (ib, b)| {
                self.rank_beat(a)
                    .cmp(&self.rank_beat(b))
                    .then(a.velocity().cmp(&b.velocity()))
                    .then(ib.cmp(ia))
            })
            .map(|(idx, _)| idx)
    }
}
