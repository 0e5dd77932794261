// Generation Parameters - Upstream controls for one generation run
// Checked by validate(), clamped by normalized()

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::{unit, BARS_MAX, BARS_MIN, TEMPO_DEFAULT, TEMPO_MAX, TEMPO_MIN};
use crate::humanize::{FeelStyle, SectionContext};

/// Errors raised when upstream parameters are out of range
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be within [0, 1], got {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("Tempo must be within [{min}, {max}] BPM, got {0}", min = TEMPO_MIN, max = TEMPO_MAX)]
    InvalidTempo(f64),

    #[error("Bar count must be within [{min}, {max}], got {0}", min = BARS_MIN, max = BARS_MAX)]
    InvalidBars(u32),

    #[error("Unknown drummer profile: {0}")]
    UnknownProfile(String),
}

/// Controls handed down by a content library or front-end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParameters {
    /// Free-form style tag (e.g. "rock", "metal"); recorded, not interpreted
    pub style: String,

    /// How busy the generated parts are [0.0, 1.0]
    pub complexity: f32,

    /// How hard the parts are played [0.0, 1.0]
    pub dynamics: f32,

    /// Humanization amount [0.0, 1.0]
    pub humanization: f32,

    /// Drummer profile applied after composition
    pub drummer: Option<String>,

    /// Probability an earlier bar gets a fill [0.0, 1.0]
    pub fill_frequency: f32,

    /// Swing ratio [0.0, 1.0]
    pub swing_ratio: f32,

    /// Tempo in BPM
    pub tempo: f64,

    pub bars: u32,

    pub section: SectionContext,

    pub feel: FeelStyle,

    pub seed: u64,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        GenerationParameters {
            style: "rock".to_string(),
            complexity: 0.5,
            dynamics: 0.5,
            humanization: 0.5,
            drummer: None,
            fill_frequency: 0.2,
            swing_ratio: 0.0,
            tempo: TEMPO_DEFAULT,
            bars: 4,
            section: SectionContext::Verse,
            feel: FeelStyle::Balanced,
            seed: 0,
        }
    }
}

impl GenerationParameters {
    /// Report the first out-of-range field
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit_fields = [
            ("complexity", self.complexity),
            ("dynamics", self.dynamics),
            ("humanization", self.humanization),
            ("fill_frequency", self.fill_frequency),
            ("swing_ratio", self.swing_ratio),
        ];

        for (field, value) in unit_fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    field,
                    value: value as f64,
                });
            }
        }

        if !(TEMPO_MIN..=TEMPO_MAX).contains(&self.tempo) {
            return Err(ConfigError::InvalidTempo(self.tempo));
        }

        if !(BARS_MIN..=BARS_MAX).contains(&self.bars) {
            return Err(ConfigError::InvalidBars(self.bars));
        }

        Ok(())
    }

    /// Copy with every numeric field clamped into range
    pub fn normalized(&self) -> Self {
        let tempo = if self.tempo.is_finite() {
            self.tempo.clamp(TEMPO_MIN, TEMPO_MAX)
        } else {
            TEMPO_DEFAULT
        };

        GenerationParameters {
            complexity: unit(self.complexity),
            dynamics: unit(self.dynamics),
            humanization: unit(self.humanization),
            fill_frequency: unit(self.fill_frequency),
            swing_ratio: unit(self.swing_ratio),
            tempo,
            bars: self.bars.clamp(BARS_MIN, BARS_MAX),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GenerationParameters::default().validate().is_ok());
    }

    #[test]
    fn test_validate_reports_field() {
        let params = GenerationParameters {
            dynamics: 1.4,
            ..Default::default()
        };
        match params.validate() {
            Err(ConfigError::OutOfRange { field, .. }) => assert_eq!(field, "dynamics"),
            other => panic!("Expected OutOfRange, got {:?}", other),
        }

        let params = GenerationParameters {
            tempo: 900.0,
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(ConfigError::InvalidTempo(900.0)));

        let params = GenerationParameters {
            bars: 0,
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(ConfigError::InvalidBars(0)));
    }

    #[test]
    fn test_normalized_clamps() {
        let params = GenerationParameters {
            complexity: -1.0,
            humanization: f32::NAN,
            tempo: 5.0,
            bars: 0,
            ..Default::default()
        }
        .normalized();

        assert_eq!(params.complexity, 0.0);
        assert_eq!(params.humanization, 0.0);
        assert_eq!(params.tempo, TEMPO_MIN);
        assert_eq!(params.bars, 1);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial_json() {
        let params: GenerationParameters =
            serde_json::from_str(r#"{"tempo": 140.0, "section": "chorus", "drummer": "bonham"}"#)
                .unwrap();
        assert_eq!(params.tempo, 140.0);
        assert_eq!(params.section, SectionContext::Chorus);
        assert_eq!(params.drummer.as_deref(), Some("bonham"));
        assert_eq!(params.bars, 4);
    }
}
