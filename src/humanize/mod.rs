// Humanization - Turns quantized patterns into performances
// Seeded Gaussian timing and velocity models scaled by feel and song section

pub mod context;
pub mod dynamics;
pub mod engine;
pub mod timing;

pub use context::{FeelStyle, SectionContext, SectionShape};
pub use dynamics::{StrokeKind, VelocityRange, FATIGUE_MIN_BARS};
pub use engine::{HumanizeSettings, Humanizer};
pub use timing::VoiceTiming;
