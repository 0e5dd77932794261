// Composer - Ordered template stack that builds one Pattern
// Each template draws from its own generator, derived from the composer seed

use super::{BasicGroove, BuildContext, CrashAccents, DoubleBassPedal, PatternBuilder, Template};
use crate::config::note;
use crate::model::{Pattern, TimeSignature};
use crate::rng;

/// Fluent template composition
#[derive(Debug, Clone, PartialEq)]
pub struct Composer {
    name: String,
    time_signature: TimeSignature,
    seed: u64,
    templates: Vec<Template>,
}

impl Composer {
    pub fn new(name: impl Into<String>) -> Self {
        Composer {
            name: name.into(),
            time_signature: TimeSignature::default(),
            seed: 0,
            templates: Vec::new(),
        }
    }

    pub fn time_signature(mut self, time_signature: TimeSignature) -> Self {
        self.time_signature = time_signature;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn add(mut self, template: Template) -> Self {
        self.templates.push(template);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Build with mid dynamics and default fill frequency
    pub fn build(&self, bars: u32, complexity: f32) -> Pattern {
        self.build_with(&BuildContext::new(bars, complexity))
    }

    /// Run every template in order into one builder and freeze the result
    pub fn build_with(&self, ctx: &BuildContext) -> Pattern {
        let ctx = ctx.normalized();
        let mut builder = PatternBuilder::new(self.name.clone(), self.time_signature);

        for (index, template) in self.templates.iter().enumerate() {
            let before = builder.len();
            let mut stage_rng = rng::derive(self.seed, index as u64);
            template.generate(&mut builder, &ctx, &mut stage_rng);
            log::debug!(
                "Template {} added {} beats to {}",
                template.name(),
                builder.len() - before,
                self.name
            );
        }

        let pattern = builder.build();
        if pattern.is_empty() {
            log::warn!("Composer {} produced an empty pattern", self.name);
        }
        pattern
    }
}

/// Kick on 1 and 3, snare on 2 and 4, eighth-note hats
pub fn basic_rock(bars: u32, complexity: f32) -> Pattern {
    Composer::new("basic_rock")
        .add(Template::BasicGroove(BasicGroove::default()))
        .build(bars, complexity)
}

/// Heavy groove with an extra kick, optional double bass and a downbeat crash
pub fn metal(bars: u32, complexity: f32, double_bass: bool) -> Pattern {
    let mut composer = Composer::new("metal_heavy").add(Template::BasicGroove(BasicGroove {
        kick_positions: vec![0.0, 2.0, 2.5],
        ..BasicGroove::default()
    }));

    if double_bass {
        composer = composer.add(Template::DoubleBassPedal(DoubleBassPedal {
            subdivision: note::SIXTEENTH,
            intensity: 0.9,
            ..DoubleBassPedal::default()
        }));
    }

    composer
        .add(Template::CrashAccents(CrashAccents::default()))
        .build(bars, complexity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Instrument;
    use crate::templates::{FunkGhostNotes, TomFill};

    #[test]
    fn test_basic_rock_one_bar() {
        let pattern = basic_rock(1, 0.5);
        assert_eq!(pattern.len(), 12);
        assert_eq!(pattern.name, "basic_rock");
        assert!(pattern.is_export_ready());
    }

    #[test]
    fn test_metal_layers() {
        let pattern = metal(2, 0.8, true);
        // 3 groove kicks + 16 pedal strokes per bar
        assert_eq!(pattern.beats_for(Instrument::Kick).len(), 38);
        assert_eq!(pattern.beats_for(Instrument::Crash).len(), 2);

        let single = metal(2, 0.8, false);
        assert_eq!(single.beats_for(Instrument::Kick).len(), 6);
    }

    #[test]
    fn test_composer_sorted_and_bounded() {
        let composer = Composer::new("funk")
            .seed(99)
            .add(Template::BasicGroove(BasicGroove::default()))
            .add(Template::FunkGhostNotes(FunkGhostNotes::default()))
            .add(Template::TomFill(TomFill::default()));

        for complexity in [0.05, 0.3, 0.7, 1.0] {
            let pattern = composer.build(4, complexity);
            assert!(!pattern.is_empty());
            assert!(pattern.is_export_ready());
        }
    }

    #[test]
    fn test_same_seed_same_pattern() {
        let composer = Composer::new("funk")
            .seed(7)
            .add(Template::FunkGhostNotes(FunkGhostNotes::default()));
        assert_eq!(composer.build(4, 0.6), composer.build(4, 0.6));

        let other = composer.clone().seed(8);
        assert_ne!(composer.build(8, 0.6), other.build(8, 0.6));
    }

    #[test]
    fn test_zero_bars_clamped() {
        let pattern = basic_rock(0, 0.5);
        assert_eq!(pattern.bar_count(), 1);
    }

    #[test]
    fn test_empty_composer_is_empty() {
        assert!(Composer::new("nothing").build(2, 0.5).is_empty());
    }

    #[test]
    fn test_time_signature_carried() {
        let pattern = Composer::new("waltz")
            .time_signature(TimeSignature::THREE_FOUR)
            .add(Template::BasicGroove(BasicGroove::default()))
            .build(2, 0.5);
        assert_eq!(pattern.time_signature, TimeSignature::THREE_FOUR);
        assert!(pattern.beats().iter().all(|b| b.position() < 6.0));
    }
}
