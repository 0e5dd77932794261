// Dynamics Model - Velocity resampling by stroke type and drummer fatigue

use crate::model::Beat;

/// Bar downbeats are struck slightly harder
pub const DOWNBEAT_BOOST: i32 = 5;

/// Base accent boost before section scaling
pub const ACCENT_BOOST: f64 = 10.0;

/// Patterns at least this long tire the drummer
pub const FATIGUE_MIN_BARS: u32 = 8;

/// Velocity lost by the final beat at full humanization
pub const FATIGUE_MAX_DROP: f64 = 0.05;

/// Stroke category deciding the velocity sub-range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeKind {
    Ghost,
    Normal,
    Accent,
}

/// Target velocity band for a stroke kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityRange {
    pub low: i32,
    pub high: i32,

    /// Spread at full humanization
    pub std_dev: f64,
}

impl VelocityRange {
    pub fn midpoint(&self) -> i32 {
        (self.low + self.high) / 2
    }
}

impl StrokeKind {
    /// Ghost flag wins over accent
    pub fn of(beat: &Beat) -> Self {
        if beat.is_ghost() {
            StrokeKind::Ghost
        } else if beat.is_accent() {
            StrokeKind::Accent
        } else {
            StrokeKind::Normal
        }
    }

    pub fn range(&self) -> VelocityRange {
        match self {
            StrokeKind::Ghost => VelocityRange {
                low: 25,
                high: 45,
                std_dev: 3.0,
            },
            StrokeKind::Normal => VelocityRange {
                low: 65,
                high: 90,
                std_dev: 8.0,
            },
            StrokeKind::Accent => VelocityRange {
                low: 95,
                high: 115,
                std_dev: 5.0,
            },
        }
    }
}

/// Velocity multiplier for a beat `progress` of the way through a long pattern
pub fn fatigue_factor(progress: f64, amount: f64) -> f64 {
    1.0 - progress.clamp(0.0, 1.0) * FATIGUE_MAX_DROP * amount
}
