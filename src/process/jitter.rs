/*!
 * Interval Jitter
 * Injected random source for decorrelating processes that share an interval
 */

use crate::core::limits::INTERVAL_JITTER_FRACTION;
use crate::core::types::Cycle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the once-per-registration interval jitter
pub trait JitterSource {
    /// Resolve `base` to a jittered interval of at least one cycle
    fn jitter(&mut self, base: Cycle) -> Cycle;
}

/// Seeded `base ± 10%` jitter
#[derive(Debug, Clone)]
pub struct SeededJitter {
    rng: StdRng,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl JitterSource for SeededJitter {
    fn jitter(&mut self, base: Cycle) -> Cycle {
        let factor = self
            .rng
            .gen_range(-INTERVAL_JITTER_FRACTION..=INTERVAL_JITTER_FRACTION);
        let jittered = (base as f64 * (1.0 + factor)).round();
        (jittered as Cycle).max(1)
    }
}

/// Identity jitter for reproducible schedules
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn jitter(&mut self, base: Cycle) -> Cycle {
        base.max(1)
    }
}
