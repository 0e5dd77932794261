// Timing Model - Per-voice lead/lag and spread, plus relational micro-timing
// All values in milliseconds; callers convert with the tempo

use crate::config::GRID_EPSILON;
use crate::model::Instrument;

/// Systematic lead/lag and spread of one voice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceTiming {
    /// Mean offset (ms); negative plays ahead of the grid
    pub bias_ms: f64,

    /// Standard deviation of the offset (ms)
    pub tightness_ms: f64,
}

impl VoiceTiming {
    pub fn for_instrument(instrument: Instrument) -> Self {
        let (bias_ms, tightness_ms) = match instrument {
            Instrument::Kick => (-2.0, 3.0),
            Instrument::Snare | Instrument::Rim => (0.0, 4.0),
            Instrument::ClosedHiHat => (0.0, 2.0),
            Instrument::OpenHiHat => (1.0, 3.0),
            Instrument::PedalHiHat => (0.0, 2.5),
            Instrument::Ride => (1.0, 5.0),
            Instrument::RideBell => (1.0, 4.0),
            Instrument::Crash | Instrument::China => (2.0, 6.0),
            Instrument::Splash => (1.5, 5.0),
            Instrument::MidTom | Instrument::FloorTom => (0.5, 5.0),
        };
        VoiceTiming {
            bias_ms,
            tightness_ms,
        }
    }

    /// Spread at a position; onsets on a whole beat are played twice as tight
    pub fn tightness_at(&self, position: f64) -> f64 {
        if on_whole_beat(position) {
            self.tightness_ms * 0.5
        } else {
            self.tightness_ms
        }
    }
}

pub(crate) fn on_whole_beat(position: f64) -> bool {
    let frac = position - position.floor();
    frac < GRID_EPSILON || 1.0 - frac < GRID_EPSILON
}

/// Window (ms) inside which onsets are treated as one stroke for micro-timing
pub const MICRO_CLUSTER_MS: f64 = 10.0;

const KICK_LEAD_MS: f64 = -2.0;
const SNARE_LAG_MS: f64 = 1.0;
const CYMBAL_LAG_MS: f64 = 3.0;

/// Deterministic relative offset (ms, before scaling) for a voice inside a cluster
///
/// Kick under a snare leads, the snare trails, and crash-type cymbals sit behind
/// everything. Single-beat clusters get nothing.
pub fn micro_offset_ms(instrument: Instrument, cluster: &[Instrument]) -> f64 {
    if cluster.len() < 2 {
        return 0.0;
    }

    let mut offset = 0.0;
    match instrument {
        Instrument::Kick if cluster.contains(&Instrument::Snare) => offset += KICK_LEAD_MS,
        Instrument::Snare if cluster.contains(&Instrument::Kick) => offset += SNARE_LAG_MS,
        _ => {}
    }
    if instrument.is_crash_type() {
        offset += CYMBAL_LAG_MS;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_voice_has_timing() {
        for instrument in Instrument::ALL {
            let timing = VoiceTiming::for_instrument(instrument);
            assert!(timing.tightness_ms > 0.0, "{}", instrument.name());
            assert!(timing.bias_ms.abs() <= 2.0);
        }
        assert_eq!(VoiceTiming::for_instrument(Instrument::Kick).bias_ms, -2.0);
    }

    #[test]
    fn test_downbeat_is_tighter() {
        let snare = VoiceTiming::for_instrument(Instrument::Snare);
        assert_eq!(snare.tightness_at(1.0), 2.0);
        assert_eq!(snare.tightness_at(1.005), 2.0);
        assert_eq!(snare.tightness_at(2.995), 2.0);
        assert_eq!(snare.tightness_at(1.5), 4.0);
    }

    #[test]
    fn test_micro_offsets() {
        let both = [Instrument::Kick, Instrument::Snare, Instrument::Crash];
        assert_eq!(micro_offset_ms(Instrument::Kick, &both), -2.0);
        assert_eq!(micro_offset_ms(Instrument::Snare, &both), 1.0);
        assert_eq!(micro_offset_ms(Instrument::Crash, &both), 3.0);

        let kick_hat = [Instrument::Kick, Instrument::ClosedHiHat];
        assert_eq!(micro_offset_ms(Instrument::Kick, &kick_hat), 0.0);

        assert_eq!(micro_offset_ms(Instrument::China, &[Instrument::China]), 0.0);
    }
}
