// ─────────────────────────────────────────────────────────────────────
// Affinity Kernel — Seeded Randomness
// ─────────────────────────────────────────────────────────────────────
//! Deterministic random source for generators.
//!
//! Every generator takes `&mut R: Rng`, so callers control seeding. The
//! config-driven pipeline uses ChaCha8 seeded from `SimulationConfig::seed`;
//! identical seeds reproduce identical populations and topics.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use affinity_types::{AffinityError, AffinityResult};

/// RNG used by the pipeline and the tests.
pub type SimRng = ChaCha8Rng;

/// ChaCha8 stream seeded from a single `u64`.
pub fn seeded(seed: u64) -> SimRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Vector of `dim` coordinates drawn independently from U[lo, hi].
pub fn uniform_vector<R: Rng + ?Sized>(rng: &mut R, dim: usize, lo: f64, hi: f64) -> Vec<f64> {
    (0..dim).map(|_| rng.gen_range(lo..=hi)).collect()
}

/// Check a noise half-width: finite, non-negative, and small enough that
/// the sampling range `[-a, a]` has a finite width.
pub fn check_amplitude(amplitude: f64, label: &str) -> AffinityResult<f64> {
    if !amplitude.is_finite() || amplitude < 0.0 || !(2.0 * amplitude).is_finite() {
        return Err(AffinityError::Validation(format!(
            "{label} must be finite and >= 0, got {amplitude}"
        )));
    }
    Ok(amplitude)
}

/// `base` plus independent U[-amplitude, amplitude] noise per coordinate.
pub fn perturb<R: Rng + ?Sized>(
    rng: &mut R,
    base: &[f64],
    amplitude: f64,
) -> AffinityResult<Vec<f64>> {
    let a = check_amplitude(amplitude, "noise amplitude")?;
    Ok(base.iter().map(|&x| x + rng.gen_range(-a..=a)).collect())
}
