// Humanizer - Statistical timing and dynamics perturbation
// Gaussian per-voice timing, relational micro-timing, velocity resampling, fatigue

use serde::{Deserialize, Serialize};

use super::context::{FeelStyle, SectionContext};
use super::dynamics::{fatigue_factor, StrokeKind, ACCENT_BOOST, DOWNBEAT_BOOST, FATIGUE_MIN_BARS};
use super::timing::{micro_offset_ms, VoiceTiming, MICRO_CLUSTER_MS};
use crate::config::{ms_to_beats, unit, GenerationParameters, GRID_EPSILON, TEMPO_DEFAULT, TEMPO_MAX, TEMPO_MIN};
use crate::model::{Beat, Instrument, Pattern};
use crate::rng::{self, StageRng};

/// Performance settings for one humanization run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HumanizeSettings {
    /// Song tempo in BPM; clamped to [20, 400]
    pub tempo: f64,

    pub feel: FeelStyle,

    /// Global humanization amount [0.0, 1.0]; 0.0 leaves the pattern untouched
    pub amount: f32,

    pub section: SectionContext,

    pub seed: u64,
}

impl Default for HumanizeSettings {
    fn default() -> Self {
        HumanizeSettings {
            tempo: TEMPO_DEFAULT,
            feel: FeelStyle::Balanced,
            amount: 0.5,
            section: SectionContext::Verse,
            seed: 0,
        }
    }
}

impl From<&GenerationParameters> for HumanizeSettings {
    fn from(params: &GenerationParameters) -> Self {
        HumanizeSettings {
            tempo: params.tempo,
            feel: params.feel,
            amount: params.humanization,
            section: params.section,
            seed: params.seed,
        }
    }
}

impl HumanizeSettings {
    /// Tempo inside the supported range; non-finite values fall back to the default
    pub fn effective_tempo(&self) -> f64 {
        if self.tempo.is_finite() {
            self.tempo.clamp(TEMPO_MIN, TEMPO_MAX)
        } else {
            TEMPO_DEFAULT
        }
    }
}

/// Turns a quantized pattern into a human-sounding performance
#[derive(Debug, Clone, Default)]
pub struct Humanizer {
    settings: HumanizeSettings,
}

impl Humanizer {
    pub fn new(settings: HumanizeSettings) -> Self {
        Humanizer { settings }
    }

    pub fn settings(&self) -> &HumanizeSettings {
        &self.settings
    }

    /// Humanize a pattern
    ///
    /// Beats are visited cluster by cluster (onsets within 10ms). Each beat gets
    /// a Gaussian offset from its voice's (bias, tightness) pair, a relational
    /// micro-timing offset when it shares the cluster, a resampled velocity and,
    /// for long patterns, a fatigue attenuation. Deterministic for a given seed.
    pub fn humanize(&self, pattern: &Pattern) -> Pattern {
        if pattern.is_empty() {
            log::warn!("Humanizer received empty pattern '{}'", pattern.name);
            return pattern.clone();
        }

        let amount = unit(self.settings.amount) as f64;
        if amount == 0.0 {
            return pattern.clone();
        }

        let tempo = self.settings.effective_tempo();
        let shape = self.settings.section.shape();
        let spread = amount * self.settings.feel.multiplier() * shape.timing;
        let accent_boost = (ACCENT_BOOST * shape.accent_strength) as i32;
        let fatigued = pattern.bar_count() >= FATIGUE_MIN_BARS;
        let length = pattern.length_beats();

        let mut rng = rng::seeded(self.settings.seed);
        let source = pattern.beats();
        let mut beats = Vec::with_capacity(source.len());

        for cluster in pattern.clusters(ms_to_beats(MICRO_CLUSTER_MS, tempo)) {
            let voices: Vec<Instrument> = cluster.beats(source).map(|b| b.instrument()).collect();

            for beat in cluster.beats(source) {
                let offset_ms = self.timing_offset_ms(beat, &voices, spread, amount, &mut rng);

                let mut velocity = sample_velocity(beat, amount, &mut rng)
                    + shape.velocity_boost
                    + if beat.is_accent() { accent_boost } else { 0 };
                if on_bar_downbeat(pattern, beat.position()) {
                    velocity += DOWNBEAT_BOOST;
                }
                velocity = velocity.clamp(1, 127);

                if fatigued && length > 0.0 {
                    let factor = fatigue_factor(beat.position() / length, amount);
                    velocity = ((velocity as f64 * factor) as i32).max(1);
                }

                beats.push(
                    beat.clone()
                        .shifted(ms_to_beats(offset_ms, tempo))
                        .with_velocity(velocity),
                );
            }
        }

        log::debug!(
            "Humanized '{}' ({} beats, {} feel, {} section, amount {:.2}, {:.0} BPM)",
            pattern.name,
            beats.len(),
            self.settings.feel.as_str(),
            self.settings.section.as_str(),
            amount,
            tempo
        );

        pattern.derive("humanized", beats).with_metadata(
            "humanization",
            serde_json::json!({
                "feel": self.settings.feel.as_str(),
                "section": self.settings.section.as_str(),
                "amount": amount,
                "tempo": tempo,
                "seed": self.settings.seed,
            }),
        )
    }

    fn timing_offset_ms(
        &self,
        beat: &Beat,
        voices: &[Instrument],
        spread: f64,
        amount: f64,
        rng: &mut StageRng,
    ) -> f64 {
        let timing = VoiceTiming::for_instrument(beat.instrument());
        let sigma = timing.tightness_at(beat.position()) * spread;
        let offset = rng::gaussian(rng, timing.bias_ms, sigma);
        offset + micro_offset_ms(beat.instrument(), voices) * amount
    }
}

/// Velocity drawn around the midpoint of the beat's stroke range
fn sample_velocity(beat: &Beat, amount: f64, rng: &mut StageRng) -> i32 {
    let range = StrokeKind::of(beat).range();
    rng::gaussian(rng, range.midpoint() as f64, range.std_dev * amount).round() as i32
}

fn on_bar_downbeat(pattern: &Pattern, position: f64) -> bool {
    let ts = pattern.time_signature;
    position - ts.bar_start(ts.bar_of(position)) < GRID_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TimeSignature;
    use crate::templates::{basic_rock, metal};

    fn humanizer(amount: f32, seed: u64) -> Humanizer {
        Humanizer::new(HumanizeSettings {
            amount,
            seed,
            ..Default::default()
        })
    }

    #[test]
    fn test_zero_amount_is_identity() {
        let input = metal(4, 0.8, true);
        let output = humanizer(0.0, 9).humanize(&input);
        assert_eq!(output, input);
    }

    #[test]
    fn test_deviation_is_bounded_by_tightness() {
        let input = basic_rock(4, 0.7);
        let settings = HumanizeSettings {
            tempo: 120.0,
            amount: 1.0,
            seed: 17,
            ..Default::default()
        };
        let output = Humanizer::new(settings).humanize(&input);
        assert_eq!(output.len(), input.len());

        let spread = settings.feel.multiplier() * settings.section.shape().timing;
        for instrument in Instrument::ALL {
            let before = input.beats_for(instrument);
            let after = output.beats_for(instrument);
            assert_eq!(before.len(), after.len());

            for (a, b) in before.iter().zip(after.iter()) {
                let timing = VoiceTiming::for_instrument(instrument);
                // bias + 3 sigma + largest micro offset
                let bound_ms =
                    timing.bias_ms.abs() + 3.0 * timing.tightness_at(a.position()) * spread + 3.0;
                let deviation = (b.position() - a.position()).abs();
                assert!(
                    deviation <= ms_to_beats(bound_ms, 120.0) + 1e-9,
                    "{} moved {} beats",
                    instrument.name(),
                    deviation
                );
            }
        }
    }

    #[test]
    fn test_velocities_stay_in_range() {
        let mut beats = Vec::new();
        for i in 0..16 {
            let position = i as f64 * 0.5;
            beats.push(Beat::new(position, Instrument::Snare, 127).unwrap().with_accent(true));
            beats.push(Beat::new(position + 0.25, Instrument::Snare, 1).unwrap().with_ghost(true));
        }
        let input = Pattern::from_beats("dyn", TimeSignature::FOUR_FOUR, beats);

        for section in SectionContext::ALL {
            for feel in [FeelStyle::Tight, FeelStyle::Balanced, FeelStyle::Loose] {
                let output = Humanizer::new(HumanizeSettings {
                    amount: 1.0,
                    section,
                    feel,
                    seed: 4,
                    ..Default::default()
                })
                .humanize(&input);

                assert!(output.is_export_ready());
                assert!(output.beats().iter().all(|b| (1..=127).contains(&b.velocity())));
            }
        }
    }

    #[test]
    fn test_breakdown_accents_louder_than_intro() {
        let beats = (0..8)
            .map(|i| Beat::new(i as f64 + 0.5, Instrument::Snare, 100).unwrap().with_accent(true))
            .collect();
        let input = Pattern::from_beats("acc", TimeSignature::FOUR_FOUR, beats);

        let mean = |section| {
            let output = Humanizer::new(HumanizeSettings {
                amount: 0.1,
                section,
                seed: 2,
                ..Default::default()
            })
            .humanize(&input);
            output.beats().iter().map(|b| b.velocity() as f64).sum::<f64>() / output.len() as f64
        };
        assert!(mean(SectionContext::Breakdown) > mean(SectionContext::Intro) + 10.0);
    }

    #[test]
    fn test_fatigue_only_for_long_patterns() {
        let long = basic_rock(8, 0.5);
        let cutoff = long.time_signature.bar_start(7);
        let short = long.with_beats(
            long.beats()
                .iter()
                .filter(|b| b.position() < cutoff)
                .cloned()
                .collect(),
        );
        assert_eq!(short.bar_count(), 7);

        let h = humanizer(1.0, 5);
        let tired = h.humanize(&long);
        let fresh = h.humanize(&short);

        // Same draws for the shared bars, so only fatigue separates them
        let sum = |p: &Pattern| -> u32 {
            p.beats()
                .iter()
                .filter(|b| b.position() < cutoff - 0.1)
                .map(|b| b.velocity() as u32)
                .sum()
        };
        assert!(sum(&tired) < sum(&fresh));
    }

    #[test]
    fn test_far_onset_and_empty_input() {
        let far = Pattern::from_beats(
            "far",
            TimeSignature::FOUR_FOUR,
            vec![Beat::new(2.0e10, Instrument::Snare, 100).unwrap()],
        );
        let output = humanizer(0.5, 3).humanize(&far);
        assert_eq!(output.len(), 1);
        assert!(output.is_export_ready());

        let empty = Pattern::new("empty");
        assert_eq!(humanizer(1.0, 3).humanize(&empty), empty);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let input = basic_rock(2, 0.5);
        assert_eq!(humanizer(0.6, 8).humanize(&input), humanizer(0.6, 8).humanize(&input));
        assert_ne!(humanizer(0.6, 8).humanize(&input), humanizer(0.6, 9).humanize(&input));
    }

    #[test]
    fn test_output_naming_and_tempo_clamp() {
        let input = basic_rock(1, 0.5);
        let output = Humanizer::new(HumanizeSettings {
            tempo: 1000.0,
            ..Default::default()
        })
        .humanize(&input);

        assert_eq!(output.name, format!("{}_humanized", input.name));
        assert_eq!(output.metadata["humanization"]["tempo"], 400.0);
        assert!(output.beats().iter().all(|b| b.position() >= 0.0));
    }
}
