// Physical Feasibility - Four-limb validation and automatic repair

pub mod conflict;
pub mod fixer;
pub mod validator;

pub use conflict::{Conflict, ConflictKind, Conversion, Resolution, ResolvedConflict};
pub use fixer::{FixReport, Fixer, FixerConfig};
pub use validator::{ValidationStats, Validator, ValidatorConfig, HANDS};
