// Time Signature - Bar length for beat-position arithmetic
// Positions are measured in quarter-note beats throughout the crate

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when a deserialized time signature has a zero part
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeSignatureError {
    #[error("Time signature parts must be non-zero, got {numerator}/{denominator}")]
    ZeroPart { numerator: u32, denominator: u32 },
}

/// Musical time signature; both parts are always non-zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TimeSignatureFields")]
pub struct TimeSignature {
    numerator: u32,
    denominator: u32,
}

/// Unvalidated wire form
#[derive(Debug, Clone, Copy, Deserialize)]
struct TimeSignatureFields {
    numerator: u32,
    denominator: u32,
}

impl TryFrom<TimeSignatureFields> for TimeSignature {
    type Error = TimeSignatureError;

    fn try_from(fields: TimeSignatureFields) -> Result<Self, Self::Error> {
        if fields.numerator == 0 || fields.denominator == 0 {
            return Err(TimeSignatureError::ZeroPart {
                numerator: fields.numerator,
                denominator: fields.denominator,
            });
        }
        Ok(TimeSignature {
            numerator: fields.numerator,
            denominator: fields.denominator,
        })
    }
}

impl TimeSignature {
    /// 4/4 time - most common
    pub const FOUR_FOUR: TimeSignature = TimeSignature { numerator: 4, denominator: 4 };

    /// 3/4 time - waltz feel
    pub const THREE_FOUR: TimeSignature = TimeSignature { numerator: 3, denominator: 4 };

    /// Create a time signature; zero parts fall back to 4
    pub fn new(numerator: u32, denominator: u32) -> Self {
        TimeSignature {
            numerator: if numerator == 0 { 4 } else { numerator },
            denominator: if denominator == 0 { 4 } else { denominator },
        }
    }

    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    pub fn denominator(&self) -> u32 {
        self.denominator
    }

    /// Length of one bar in quarter-note beats (6/8 -> 3.0), always positive
    pub fn beats_per_bar(&self) -> f64 {
        self.numerator as f64 * (4.0 / self.denominator as f64)
    }

    /// Bar index (0-based) containing a position; saturates for huge positions
    pub fn bar_of(&self, position: f64) -> u32 {
        (position.max(0.0) / self.beats_per_bar()).floor() as u32
    }

    /// Start position of a bar
    pub fn bar_start(&self, bar: u32) -> f64 {
        bar as f64 * self.beats_per_bar()
    }

    /// End position of a bar (start of the next one)
    pub fn bar_end(&self, bar: u32) -> f64 {
        self.bar_start(bar) + self.beats_per_bar()
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        TimeSignature::FOUR_FOUR
    }
}

impl std::fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beats_per_bar() {
        assert_eq!(TimeSignature::FOUR_FOUR.beats_per_bar(), 4.0);
        assert_eq!(TimeSignature::THREE_FOUR.beats_per_bar(), 3.0);
        assert_eq!(TimeSignature::new(6, 8).beats_per_bar(), 3.0);
    }

    #[test]
    fn test_bar_of() {
        let ts = TimeSignature::FOUR_FOUR;
        assert_eq!(ts.bar_of(0.0), 0);
        assert_eq!(ts.bar_of(3.99), 0);
        assert_eq!(ts.bar_of(4.0), 1);
        assert_eq!(ts.bar_start(2), 8.0);
        assert_eq!(ts.bar_end(2), 12.0);
        assert_eq!(ts.bar_of(1.0e12), u32::MAX);
    }

    #[test]
    fn test_zero_parts_fall_back() {
        let ts = TimeSignature::new(0, 0);
        assert_eq!(ts, TimeSignature::FOUR_FOUR);
        assert_eq!(ts.to_string(), "4/4");
    }

    #[test]
    fn test_deserialize_rejects_zero_parts() {
        let ok: TimeSignature = serde_json::from_str(r#"{"numerator":7,"denominator":8}"#).unwrap();
        assert_eq!((ok.numerator(), ok.denominator()), (7, 8));

        assert!(serde_json::from_str::<TimeSignature>(r#"{"numerator":0,"denominator":4}"#).is_err());
        assert!(serde_json::from_str::<TimeSignature>(r#"{"numerator":4,"denominator":0}"#).is_err());
    }
}
