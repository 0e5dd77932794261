// Pipeline Runner - Compose, modify, validate, fix and humanize in one call
// Every stage draws from a generator derived from the run seed

use rand::Rng;
use thiserror::Error;

use super::trace::{Stage, Trace, TraceEntry, TraceError, TraceWriter};
use crate::config::{ConfigError, GenerationParameters};
use crate::humanize::{HumanizeSettings, Humanizer};
use crate::model::Pattern;
use crate::modifications::{DrummerProfile, Fallback};
use crate::rng;
use crate::templates::{BuildContext, Composer};
use crate::validation::{Fixer, FixerConfig, ResolvedConflict, Validator, ValidatorConfig};

/// Errors raised before or after a run; the stages themselves never fail
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid parameters: {0}")]
    Config(#[from] ConfigError),

    #[error("Trace error: {0}")]
    Trace(#[from] TraceError),
}

/// Everything a run produced
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Final, export-ready pattern
    pub pattern: Pattern,

    /// Conflicts the fixer cleared
    pub conflicts: Vec<ResolvedConflict>,

    /// Modifications whose output was discarded
    pub fallbacks: Vec<Fallback>,

    pub trace: Vec<TraceEntry>,
}

/// Validated parameters plus the resolved drummer profile
#[derive(Debug, Clone)]
pub struct Pipeline {
    params: GenerationParameters,
    profile: Option<DrummerProfile>,
    validator: Validator,
    fixer: Fixer,
}

impl Pipeline {
    /// Check parameters and resolve the drummer name
    pub fn new(params: GenerationParameters) -> Result<Self, PipelineError> {
        params.validate()?;

        let profile = match params.drummer.as_deref() {
            Some(name) => Some(
                DrummerProfile::built_in(name)
                    .ok_or_else(|| ConfigError::UnknownProfile(name.to_string()))?,
            ),
            None => None,
        };

        Ok(Pipeline {
            params,
            profile,
            validator: Validator::default(),
            fixer: Fixer::default(),
        })
    }

    /// Replace the built-in profile lookup with a caller-supplied chain
    pub fn with_profile(mut self, profile: DrummerProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Custom validator; its simultaneity window also becomes the fixer's
    pub fn with_validator(mut self, config: ValidatorConfig) -> Self {
        let fixer_config = FixerConfig {
            tolerance: config.tolerance,
            ..self.fixer.config().clone()
        };
        self.fixer = Fixer::new(fixer_config);
        self.validator = Validator::new(config);
        self
    }

    /// Custom fixer policy; the window stays the validator's
    pub fn with_fixer(mut self, config: FixerConfig) -> Self {
        self.fixer = Fixer::new(FixerConfig {
            tolerance: self.validator.config().tolerance,
            ..config
        });
        self
    }

    pub fn params(&self) -> &GenerationParameters {
        &self.params
    }

    pub fn profile(&self) -> Option<&DrummerProfile> {
        self.profile.as_ref()
    }

    /// Run every stage on the composer's templates
    ///
    /// The composer is reseeded from the run seed so one `GenerationParameters`
    /// value always reproduces the same performance.
    pub fn run(&self, composer: &Composer) -> PipelineOutput {
        let params = &self.params;
        let mut trace = Trace::new();

        // Compose
        let ctx = BuildContext {
            bars: params.bars,
            complexity: params.complexity,
            dynamics: params.dynamics,
            fill_frequency: params.fill_frequency,
        };
        let composed = composer
            .clone()
            .seed(stage_seed(params.seed, "compose"))
            .build_with(&ctx);
        let swing = composed.swing_ratio.max(params.swing_ratio as f64);
        let composed = composed
            .with_swing_ratio(swing)
            .with_metadata("style", params.style.clone());
        trace.complete(
            Stage::Compose,
            format!("Composed {} from {} templates", composer.name(), composer.templates().len()),
            serde_json::json!({ "beats": composed.len(), "bars": composed.bar_count() }),
        );

        // Modify
        let (modified, fallbacks) = match &self.profile {
            Some(profile) => {
                let report = profile.apply(&composed, stage_seed(params.seed, "modify"));
                for fallback in &report.fallbacks {
                    trace.note(
                        Stage::Modify,
                        format!("{} emptied the pattern; input kept", fallback.stage),
                        serde_json::json!(fallback),
                    );
                }
                (report.pattern, report.fallbacks)
            }
            None => (composed, Vec::new()),
        };
        trace.complete(
            Stage::Modify,
            match &self.profile {
                Some(profile) => format!("Applied drummer profile {}", profile.name),
                None => "No drummer profile".to_string(),
            },
            serde_json::json!({ "beats": modified.len(), "fallbacks": fallbacks.len() }),
        );

        // Validate
        let found = self.validator.validate(&modified);
        for conflict in &found {
            trace.note(Stage::Validate, conflict.to_string(), serde_json::json!(conflict));
        }
        trace.complete(
            Stage::Validate,
            format!("Found {} conflicts", found.len()),
            serde_json::json!({ "conflicts": found.len() }),
        );

        // Fix
        let report = self.fixer.fix(&modified, params.dynamics);
        trace.complete(
            Stage::Fix,
            format!("Resolved {} conflicts", report.conflicts.len()),
            serde_json::json!({
                "dropped": report.dropped_count(),
                "converted": report.converted_count(),
                "beats": report.pattern.len(),
            }),
        );

        // Humanize
        let settings = HumanizeSettings {
            seed: stage_seed(params.seed, "humanize"),
            ..HumanizeSettings::from(params)
        };
        let pattern = Humanizer::new(settings).humanize(&report.pattern);
        trace.complete(
            Stage::Humanize,
            format!(
                "Humanized with {} feel for {}",
                params.feel.as_str(),
                params.section.as_str()
            ),
            serde_json::json!({
                "amount": params.humanization,
                "tempo": settings.effective_tempo(),
                "beats": pattern.len(),
            }),
        );

        log::info!(
            "Pipeline produced '{}' ({} beats, {} conflicts fixed, {} fallbacks)",
            pattern.name,
            pattern.len(),
            report.conflicts.len(),
            fallbacks.len()
        );

        PipelineOutput {
            pattern,
            conflicts: report.conflicts,
            fallbacks,
            trace: trace.into_entries(),
        }
    }

    /// Run and append the trace to a JSONL file
    pub fn run_traced(&self, composer: &Composer, writer: &TraceWriter) -> Result<PipelineOutput, PipelineError> {
        let output = self.run(composer);
        writer.append(&output.trace)?;
        Ok(output)
    }
}

/// Seed for one named stage of a run
fn stage_seed(seed: u64, stage: &str) -> u64 {
    rng::derive_named(seed, stage).gen()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Beat, Instrument};
    use crate::pipeline::read_trace_file;
    use crate::templates::{BasicGroove, CrashAccents, JazzRidePattern, Template, TomFill};
    use tempfile::TempDir;

    fn rock() -> Composer {
        Composer::new("rock")
            .add(Template::BasicGroove(BasicGroove::default()))
            .add(Template::TomFill(TomFill::default()))
            .add(Template::CrashAccents(CrashAccents::default()))
    }

    fn params() -> GenerationParameters {
        GenerationParameters {
            drummer: Some("bonham".to_string()),
            humanization: 0.4,
            seed: 11,
            ..Default::default()
        }
    }

    #[test]
    fn test_unknown_drummer_rejected() {
        let result = Pipeline::new(GenerationParameters {
            drummer: Some("animal".to_string()),
            ..Default::default()
        });
        assert!(matches!(
            result,
            Err(PipelineError::Config(ConfigError::UnknownProfile(ref name))) if name == "animal"
        ));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let result = Pipeline::new(GenerationParameters {
            tempo: 5.0,
            ..Default::default()
        });
        assert!(matches!(result, Err(PipelineError::Config(ConfigError::InvalidTempo(_)))));
    }

    #[test]
    fn test_run_produces_playable_pattern() {
        let pipeline = Pipeline::new(params()).unwrap();
        let output = pipeline.run(&rock());

        assert!(!output.pattern.is_empty());
        assert!(output.pattern.is_export_ready());
        assert!(output.pattern.name.ends_with("_humanized"));
        assert_eq!(output.pattern.metadata["drummer"], "bonham");
        assert_eq!(output.pattern.metadata["style"], "rock");

        let stages: Vec<Stage> = output.trace.iter().map(|e| e.stage).collect();
        assert_eq!(stages.first(), Some(&Stage::Compose));
        assert_eq!(stages.last(), Some(&Stage::Humanize));
        assert_eq!(output.trace.last().unwrap().progress, 1.0);
    }

    #[test]
    fn test_run_is_reproducible() {
        let pipeline = Pipeline::new(params()).unwrap();
        let a = pipeline.run(&rock());
        let b = pipeline.run(&rock());
        assert_eq!(a.pattern, b.pattern);
        assert_eq!(a.conflicts, b.conflicts);
    }

    #[test]
    fn test_conflicts_cleared_and_traced() {
        // Ride over eighth hats collides on every eighth
        let composer = Composer::new("clash")
            .add(Template::BasicGroove(BasicGroove::default()))
            .add(Template::JazzRide(JazzRidePattern {
                swing_ratio: 0.0,
                ..Default::default()
            }));
        let pipeline = Pipeline::new(GenerationParameters {
            humanization: 0.0,
            dynamics: 0.9,
            ..Default::default()
        })
        .unwrap();

        let output = pipeline.run(&composer);
        assert!(!output.conflicts.is_empty());
        assert!(Validator::default().is_valid(&output.pattern));

        let notes = output
            .trace
            .iter()
            .filter(|e| e.stage == Stage::Validate && e.data.as_ref().map_or(false, |d| d.get("kind").is_some()))
            .count();
        assert!(notes >= 1 && notes <= output.conflicts.len());
    }

    #[test]
    fn test_custom_window_shared_with_fixer() {
        let wide = ValidatorConfig { tolerance: 0.3 };
        let pipeline = Pipeline::new(GenerationParameters {
            humanization: 0.0,
            ..Default::default()
        })
        .unwrap()
        .with_validator(wide)
        .with_fixer(FixerConfig {
            convert_to_pedal: false,
            ..Default::default()
        });
        assert_eq!(pipeline.fixer.config().tolerance, 0.3);
        assert!(!pipeline.fixer.config().convert_to_pedal);

        // Triplet ride against straight eighth hats: only the wide window groups 0.5 with 0.667
        let composer = Composer::new("offset").add(Template::BasicGroove(BasicGroove::default())).add(
            Template::JazzRide(JazzRidePattern {
                swing_ratio: 0.0,
                ..Default::default()
            }),
        );
        let output = pipeline.run(&composer);
        assert!(!output.conflicts.is_empty());
        assert!(Validator::new(wide).is_valid(&output.pattern));
    }

    #[test]
    fn test_fallbacks_reported() {
        let hats_only = Composer::new("hats").add(Template::BasicGroove(BasicGroove {
            kick_positions: Vec::new(),
            snare_positions: Vec::new(),
            open_hihat_positions: Vec::new(),
            ..Default::default()
        }));
        let profile = DrummerProfile::new("erase").step(
            crate::modifications::Modification::MinimalCreativity(
                crate::modifications::MinimalCreativity { sparseness: 1.0 },
            ),
            1.0,
        );
        let pipeline = Pipeline::new(GenerationParameters::default())
            .unwrap()
            .with_profile(profile);

        let output = pipeline.run(&hats_only);
        assert_eq!(output.fallbacks.len(), 1);
        assert!(!output.pattern.is_empty());
        assert!(output.trace.iter().any(|e| e.stage == Stage::Modify && e.message.contains("emptied")));
    }

    #[test]
    fn test_run_traced_writes_jsonl() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("run.jsonl");
        let writer = TraceWriter::new(&path);

        let pipeline = Pipeline::new(params()).unwrap();
        let output = pipeline.run_traced(&rock(), &writer).unwrap();

        let entries = read_trace_file(&path).unwrap();
        assert_eq!(entries.len(), output.trace.len());
        assert_eq!(entries[0].stage, Stage::Compose);
    }

    #[test]
    fn test_sections_run_concurrently() {
        let composer = rock();
        let sections = [
            crate::humanize::SectionContext::Intro,
            crate::humanize::SectionContext::Verse,
            crate::humanize::SectionContext::Chorus,
        ];

        let parallel: Vec<Pattern> = std::thread::scope(|scope| {
            let handles: Vec<_> = sections
                .iter()
                .map(|&section| {
                    let composer = &composer;
                    scope.spawn(move || {
                        let pipeline = Pipeline::new(GenerationParameters { section, ..params() }).unwrap();
                        pipeline.run(composer).pattern
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for (section, pattern) in sections.iter().zip(parallel.iter()) {
            let serial = Pipeline::new(GenerationParameters {
                section: *section,
                ..params()
            })
            .unwrap()
            .run(&composer)
            .pattern;
            assert_eq!(&serial, pattern);
        }
    }

    #[test]
    fn test_single_beat_survives() {
        let composer = Composer::new("one").add(Template::BasicGroove(BasicGroove {
            kick_positions: vec![0.0],
            snare_positions: Vec::new(),
            open_hihat_positions: Vec::new(),
            hihat_subdivision: 4.0,
            ..Default::default()
        }));
        let pipeline = Pipeline::new(GenerationParameters {
            bars: 1,
            humanization: 0.0,
            ..Default::default()
        })
        .unwrap();
        let output = pipeline.run(&composer);
        assert!(output
            .pattern
            .beats()
            .iter()
            .any(|b: &Beat| b.instrument() == Instrument::Kick));
    }
}
