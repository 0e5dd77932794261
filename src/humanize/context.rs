// Performance Context - Feel styles and song-section behaviour
// Scales how far a humanized performance strays from the grid

use serde::{Deserialize, Serialize};

/// Overall looseness of the performer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeelStyle {
    Tight,
    #[default]
    Balanced,
    Loose,
}

impl FeelStyle {
    /// Timing spread multiplier
    pub fn multiplier(&self) -> f64 {
        match self {
            FeelStyle::Tight => 0.5,
            FeelStyle::Balanced => 1.0,
            FeelStyle::Loose => 1.8,
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tight" => Some(FeelStyle::Tight),
            "balanced" => Some(FeelStyle::Balanced),
            "loose" => Some(FeelStyle::Loose),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeelStyle::Tight => "tight",
            FeelStyle::Balanced => "balanced",
            FeelStyle::Loose => "loose",
        }
    }
}

/// Song section the pattern is played in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionContext {
    #[default]
    Verse,
    Chorus,
    Fill,
    Breakdown,
    Intro,
    Outro,
}

/// Per-section scaling of timing spread, velocity and accents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionShape {
    /// Multiplier on timing spread
    pub timing: f64,

    /// Added to every sampled velocity
    pub velocity_boost: i32,

    /// Multiplier on the accent boost
    pub accent_strength: f64,
}

impl SectionContext {
    pub const ALL: [SectionContext; 6] = [
        SectionContext::Verse,
        SectionContext::Chorus,
        SectionContext::Fill,
        SectionContext::Breakdown,
        SectionContext::Intro,
        SectionContext::Outro,
    ];

    pub fn shape(&self) -> SectionShape {
        let (timing, velocity_boost, accent_strength) = match self {
            SectionContext::Verse => (0.8, 0, 1.0),
            SectionContext::Chorus => (1.2, 10, 1.3),
            SectionContext::Fill => (1.5, 5, 1.5),
            SectionContext::Breakdown => (0.9, 15, 2.0),
            SectionContext::Intro => (0.85, -5, 0.8),
            SectionContext::Outro => (1.0, -10, 0.7),
        };
        SectionShape {
            timing,
            velocity_boost,
            accent_strength,
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "verse" => Some(SectionContext::Verse),
            "chorus" => Some(SectionContext::Chorus),
            "fill" => Some(SectionContext::Fill),
            "breakdown" => Some(SectionContext::Breakdown),
            "intro" => Some(SectionContext::Intro),
            "outro" => Some(SectionContext::Outro),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionContext::Verse => "verse",
            SectionContext::Chorus => "chorus",
            SectionContext::Fill => "fill",
            SectionContext::Breakdown => "breakdown",
            SectionContext::Intro => "intro",
            SectionContext::Outro => "outro",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feel_ordering() {
        assert!(FeelStyle::Tight.multiplier() < FeelStyle::Balanced.multiplier());
        assert!(FeelStyle::Balanced.multiplier() < FeelStyle::Loose.multiplier());
    }

    #[test]
    fn test_section_table() {
        let breakdown = SectionContext::Breakdown.shape();
        assert_eq!(breakdown.velocity_boost, 15);
        assert_eq!(breakdown.accent_strength, 2.0);

        let outro = SectionContext::Outro.shape();
        assert_eq!(outro.velocity_boost, -10);
    }

    #[test]
    fn test_string_conversion() {
        for section in SectionContext::ALL {
            assert_eq!(SectionContext::from_string(section.as_str()), Some(section));
        }
        assert_eq!(FeelStyle::from_string("LOOSE"), Some(FeelStyle::Loose));
        assert_eq!(FeelStyle::from_string("sloppy"), None);
    }
}
