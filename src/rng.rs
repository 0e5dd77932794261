// Seeded Randomness - Explicit generators for every stochastic stage
// No global RNG state; each stage receives the generator it draws from

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Generator type threaded through templates, modifications and humanization
pub type StageRng = Pcg32;

/// Create a generator from a caller seed
pub fn seeded(seed: u64) -> StageRng {
    Pcg32::seed_from_u64(seed)
}

/// Derive an independent generator for one step of a chain
///
/// Mixes the step index into the seed (splitmix64 finalizer) so neighbouring
/// steps never share a stream.
pub fn derive(seed: u64, index: u64) -> StageRng {
    let mut z = seed ^ index.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    Pcg32::seed_from_u64(z)
}

/// Derive a generator for a named stage so reordering unrelated stages keeps streams stable
pub fn derive_named(seed: u64, name: &str) -> StageRng {
    let salt = name
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325u64, |h, b| (h ^ b as u64).wrapping_mul(0x0100_0000_01b3));
    derive(seed, salt)
}

/// Bernoulli draw; probabilities outside [0, 1] are clamped
pub fn chance<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> bool {
    if !(probability > 0.0) {
        return false;
    }
    rng.gen::<f64>() < probability.min(1.0)
}

/// Gaussian sample truncated to mean ± 3σ (Box-Muller)
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    if !(std_dev > 0.0) || !std_dev.is_finite() {
        return mean;
    }

    // 1 - gen() lies in (0, 1], keeping ln() finite
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();

    mean + z.clamp(-3.0, 3.0) * std_dev
}

/// Uniform sample in [-bound, bound]
pub fn symmetric<R: Rng + ?Sized>(rng: &mut R, bound: f64) -> f64 {
    if !(bound > 0.0) || !bound.is_finite() {
        return 0.0;
    }
    rng.gen_range(-bound..=bound)
}
