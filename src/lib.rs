// Drumsmith - Procedural drum performance generation
// Template composition, drummer-style modifications, limb validation and humanization

pub mod config;
pub mod humanize;
pub mod model;
pub mod modifications;
pub mod pipeline;
pub mod registry;
pub mod rng;
pub mod templates;
pub mod validation;

pub use config::{ConfigError, GenerationParameters};
pub use humanize::{FeelStyle, HumanizeSettings, Humanizer, SectionContext};
pub use model::{Beat, BeatError, Instrument, Pattern, TimeSignature};
pub use modifications::{DrummerProfile, Modification};
pub use pipeline::{Pipeline, PipelineError, PipelineOutput};
pub use templates::{Composer, Template};
pub use validation::{Conflict, Fixer, Validator};

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_model_types_are_thread_safe() {
        assert_send_sync::<Pattern>();
        assert_send_sync::<Composer>();
        assert_send_sync::<DrummerProfile>();
        assert_send_sync::<Pipeline>();
        assert_send_sync::<Humanizer>();
    }
}
