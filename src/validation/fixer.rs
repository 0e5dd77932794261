// Physical Fixer - Deterministic repair of unplayable clusters
// Ride/hi-hat collisions first, then the two-hand limit

use serde::{Deserialize, Serialize};

use super::conflict::{ConflictKind, Conversion, Resolution, ResolvedConflict};
use super::validator::{check_cluster, HANDS};
use crate::config::{unit, VoicePriority, SIMULTANEITY_TOLERANCE_BEATS};
use crate::model::{Beat, Instrument, Pattern};

/// Fixer policy knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixerConfig {
    /// At or above this intensity the ride outranks the hand hi-hat
    pub high_intensity_threshold: f32,

    /// Turn a losing hand hi-hat into a pedal "chick" instead of dropping it
    pub convert_to_pedal: bool,

    /// Velocity removed from a converted hi-hat (at least 1)
    pub pedal_velocity_drop: i32,

    pub tolerance: f64,

    pub priority: VoicePriority,
}

impl Default for FixerConfig {
    fn default() -> Self {
        FixerConfig {
            high_intensity_threshold: 0.5,
            convert_to_pedal: true,
            pedal_velocity_drop: 20,
            tolerance: SIMULTANEITY_TOLERANCE_BEATS,
            priority: VoicePriority::default(),
        }
    }
}

/// Fixed pattern plus every conflict that was cleared
#[derive(Debug, Clone, PartialEq)]
pub struct FixReport {
    pub pattern: Pattern,
    pub conflicts: Vec<ResolvedConflict>,
}

impl FixReport {
    pub fn dropped_count(&self) -> usize {
        self.conflicts.iter().map(|c| c.resolution.dropped.len()).sum()
    }

    pub fn converted_count(&self) -> usize {
        self.conflicts.iter().map(|c| c.resolution.converted.len()).sum()
    }
}

/// Clears validator conflicts without ever failing
#[derive(Debug, Clone, Default)]
pub struct Fixer {
    config: FixerConfig,
}

impl Fixer {
    pub fn new(config: FixerConfig) -> Self {
        Fixer { config }
    }

    pub fn config(&self) -> &FixerConfig {
        &self.config
    }

    /// Repair every conflicting cluster
    ///
    /// `intensity` is the playing context in [0, 1]; it decides whether the
    /// ride or the hand hi-hat keeps the timekeeping hand. Passes repeat until
    /// no cluster conflicts, since dropping an anchor beat can regroup its
    /// neighbours; each pass removes or converts at least one beat.
    pub fn fix(&self, pattern: &Pattern, intensity: f32) -> FixReport {
        if pattern.is_empty() {
            log::warn!("Fixer received empty pattern '{}'", pattern.name);
        }

        let ride_primary = unit(intensity) >= self.config.high_intensity_threshold;
        let mut current = pattern.clone();
        let mut resolved = Vec::new();

        for _ in 0..=pattern.len() {
            let (next, cleared) = self.fix_pass(&current, ride_primary);
            if cleared.is_empty() {
                break;
            }
            resolved.extend(cleared);
            current = next;
        }

        if !resolved.is_empty() {
            log::info!(
                "Fixed {} conflicts in '{}' ({} -> {} beats)",
                resolved.len(),
                pattern.name,
                pattern.len(),
                current.len()
            );
        }

        FixReport {
            pattern: current,
            conflicts: resolved,
        }
    }

    fn fix_pass(&self, pattern: &Pattern, ride_primary: bool) -> (Pattern, Vec<ResolvedConflict>) {
        let source = pattern.beats();
        let mut beats = Vec::with_capacity(source.len());
        let mut resolved = Vec::new();

        for cluster in pattern.clusters(self.config.tolerance) {
            let mut members: Vec<Beat> = cluster.beats(source).cloned().collect();
            let mut conflicts = check_cluster(&cluster, source);
            // Ride/hi-hat first: a converted hat frees a hand before the limit is enforced
            conflicts.sort_by_key(|c| matches!(c.kind, ConflictKind::TooManyHands { .. }));

            for conflict in conflicts {
                let resolution = match conflict.kind {
                    ConflictKind::RideHiHat => self.resolve_ride_hihat(&mut members, ride_primary),
                    ConflictKind::TooManyHands { .. } => self.resolve_hand_limit(&mut members),
                };
                resolved.push(ResolvedConflict {
                    conflict,
                    resolution,
                });
            }

            beats.extend(members);
        }

        (pattern.with_beats(beats), resolved)
    }

    fn resolve_ride_hihat(&self, members: &mut Vec<Beat>, ride_primary: bool) -> Resolution {
        let mut resolution = Resolution::default();
        let has_ride = members.iter().any(|b| b.instrument().is_ride());
        let has_hat = members.iter().any(|b| b.instrument().is_hand_hihat());
        if !(has_ride && has_hat) {
            return resolution;
        }

        if !ride_primary {
            members.retain(|b| {
                let lose = b.instrument().is_ride();
                if lose {
                    resolution.dropped.push(b.clone());
                }
                !lose
            });
            return resolution;
        }

        let drop = self.config.pedal_velocity_drop.max(1);
        let mut pedal_present = members.iter().any(|b| b.instrument() == Instrument::PedalHiHat);
        let mut kept = Vec::with_capacity(members.len());

        for beat in members.drain(..) {
            if !beat.instrument().is_hand_hihat() {
                kept.push(beat);
                continue;
            }

            let vel = beat.velocity() as i32;
            if self.config.convert_to_pedal && vel > 1 && !pedal_present {
                let pedal = beat
                    .clone()
                    .with_instrument(Instrument::PedalHiHat)
                    .with_velocity((vel - drop).max(1));
                pedal_present = true;
                resolution.converted.push(Conversion {
                    from: beat,
                    to: pedal.clone(),
                });
                kept.push(pedal);
            } else {
                resolution.dropped.push(beat);
            }
        }

        *members = kept;
        resolution
    }

    fn resolve_hand_limit(&self, members: &mut Vec<Beat>) -> Resolution {
        let mut resolution = Resolution::default();
        let priority = &self.config.priority;

        loop {
            let hands: Vec<usize> = (0..members.len())
                .filter(|&i| members[i].instrument().is_hand())
                .collect();
            if hands.len() <= HANDS {
                break;
            }

            // Weakest: lowest rank, then quietest, then latest inserted
            let weakest = hands.iter().copied().min_by(|&a, &b| {
                let (x, y) = (&members[a], &members[b]);
                priority
                    .rank_beat(x)
                    .cmp(&priority.rank_beat(y))
                    .then(x.velocity().cmp(&y.velocity()))
                    .then(b.cmp(&a))
            });

            match weakest {
                Some(idx) => resolution.dropped.push(members.remove(idx)),
                None => break,
            }
        }

        resolution
    }
}
