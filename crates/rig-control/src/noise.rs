//! Temporally correlated actuator noise.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Guards the decay exponent against a zero correlation time.
const RATE_EPS: f32 = 1e-6;

/// Ornstein-Uhlenbeck noise source for actuator commands.
///
/// Each injection mixes the previous command with fresh Gaussian noise so the
/// perturbation has a configurable correlation time (`rate`) and stationary
/// standard deviation (`std`) instead of buzzing as independent white noise.
#[derive(Debug)]
pub struct NoiseInjector {
    rng: SmallRng,
}

impl Default for NoiseInjector {
    fn default() -> Self {
        Self::new()
    }
}

impl NoiseInjector {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Deterministic injector for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Perturbs every actuator command in place. No-op when `std <= 0`.
    pub fn inject(&mut self, ctrl: &mut [f32], dt: f32, rate: f32, std: f32) {
        if std <= 0.0 {
            return;
        }
        let decay = (-dt / rate.max(RATE_EPS)).exp();
        let scale = std * (1.0 - decay * decay).sqrt();
        for c in ctrl.iter_mut() {
            let z: f32 = self.rng.sample(StandardNormal);
            *c = decay * *c + scale * z;
        }
    }
}
