// Drum Instruments - Kit voices, drum-map codes, and limb/voice classes
// Every onset in a pattern names one of these voices

use serde::{Deserialize, Serialize};

/// Enumerated drum voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instrument {
    /// Bass drum, right foot
    Kick,
    Snare,
    /// Rim click / cross stick
    Rim,
    /// Closed hi-hat struck by hand
    ClosedHiHat,
    /// Open hi-hat struck by hand
    OpenHiHat,
    /// Hi-hat "chick" played with the left foot
    PedalHiHat,
    MidTom,
    FloorTom,
    Crash,
    Ride,
    RideBell,
    Splash,
    China,
}

/// Coarse voice grouping used for priorities and modification targeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceClass {
    Snare,
    Kick,
    /// Crash, china, splash, ride and ride bell
    Cymbal,
    /// Toms and rim
    Tom,
    /// Closed or open hi-hat played with a stick
    HandHiHat,
    /// Foot-operated hi-hat pedal
    PedalHiHat,
}

/// Which limb plays a voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimbClass {
    /// Either hand; can strike any hand-operated voice
    Hand,
    /// Right foot, permanently bound to the kick pedal
    FootKick,
    /// Left foot, permanently bound to the hi-hat pedal
    FootHiHat,
}

impl Instrument {
    /// All voices in drum-map order
    pub const ALL: [Instrument; 13] = [
        Instrument::Kick,
        Instrument::Snare,
        Instrument::Rim,
        Instrument::ClosedHiHat,
        Instrument::OpenHiHat,
        Instrument::PedalHiHat,
        Instrument::MidTom,
        Instrument::FloorTom,
        Instrument::Crash,
        Instrument::Ride,
        Instrument::RideBell,
        Instrument::Splash,
        Instrument::China,
    ];

    /// Parse from the snake_case name
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "kick" => Some(Instrument::Kick),
            "snare" => Some(Instrument::Snare),
            "rim" => Some(Instrument::Rim),
            "closed_hi_hat" | "closed_hh" => Some(Instrument::ClosedHiHat),
            "open_hi_hat" | "open_hh" => Some(Instrument::OpenHiHat),
            "pedal_hi_hat" | "pedal_hh" => Some(Instrument::PedalHiHat),
            "mid_tom" => Some(Instrument::MidTom),
            "floor_tom" => Some(Instrument::FloorTom),
            "crash" => Some(Instrument::Crash),
            "ride" => Some(Instrument::Ride),
            "ride_bell" => Some(Instrument::RideBell),
            "splash" => Some(Instrument::Splash),
            "china" => Some(Instrument::China),
            _ => None,
        }
    }

    /// Stable snake_case name
    pub fn name(&self) -> &'static str {
        match self {
            Instrument::Kick => "kick",
            Instrument::Snare => "snare",
            Instrument::Rim => "rim",
            Instrument::ClosedHiHat => "closed_hi_hat",
            Instrument::OpenHiHat => "open_hi_hat",
            Instrument::PedalHiHat => "pedal_hi_hat",
            Instrument::MidTom => "mid_tom",
            Instrument::FloorTom => "floor_tom",
            Instrument::Crash => "crash",
            Instrument::Ride => "ride",
            Instrument::RideBell => "ride_bell",
            Instrument::Splash => "splash",
            Instrument::China => "china",
        }
    }

    /// General MIDI percussion key (channel 10) used by downstream serializers
    pub fn gm_note(&self) -> u8 {
        match self {
            Instrument::Kick => 36,        // Bass Drum 1
            Instrument::Snare => 38,       // Acoustic Snare
            Instrument::Rim => 40,         // Electric Snare / rim
            Instrument::ClosedHiHat => 42, // Closed Hi-Hat
            Instrument::OpenHiHat => 46,   // Open Hi-Hat
            Instrument::PedalHiHat => 44,  // Pedal Hi-Hat
            Instrument::MidTom => 47,      // Low-Mid Tom
            Instrument::FloorTom => 43,    // High Floor Tom
            Instrument::Crash => 49,       // Crash Cymbal 1
            Instrument::Ride => 51,        // Ride Cymbal 1
            Instrument::RideBell => 53,    // Ride Bell
            Instrument::Splash => 55,      // Splash Cymbal
            Instrument::China => 52,       // Chinese Cymbal
        }
    }

    pub fn voice_class(&self) -> VoiceClass {
        match self {
            Instrument::Kick => VoiceClass::Kick,
            Instrument::Snare => VoiceClass::Snare,
            Instrument::Rim | Instrument::MidTom | Instrument::FloorTom => VoiceClass::Tom,
            Instrument::ClosedHiHat | Instrument::OpenHiHat => VoiceClass::HandHiHat,
            Instrument::PedalHiHat => VoiceClass::PedalHiHat,
            Instrument::Crash
            | Instrument::Ride
            | Instrument::RideBell
            | Instrument::Splash
            | Instrument::China => VoiceClass::Cymbal,
        }
    }

    pub fn limb_class(&self) -> LimbClass {
        match self {
            Instrument::Kick => LimbClass::FootKick,
            Instrument::PedalHiHat => LimbClass::FootHiHat,
            _ => LimbClass::Hand,
        }
    }

    pub fn is_hand(&self) -> bool {
        self.limb_class() == LimbClass::Hand
    }

    /// Ride cymbal voices (bow or bell)
    pub fn is_ride(&self) -> bool {
        matches!(self, Instrument::Ride | Instrument::RideBell)
    }

    /// Hi-hat voices struck by a stick; these compete with the ride for the same hand
    pub fn is_hand_hihat(&self) -> bool {
        self.voice_class() == VoiceClass::HandHiHat
    }

    /// Crash-type cymbals that speak late
    pub fn is_crash_type(&self) -> bool {
        matches!(self, Instrument::Crash | Instrument::China | Instrument::Splash)
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
