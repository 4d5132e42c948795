use std::time::Duration;

use rand::Rng;

/// Randomized pause between two calls of the same worker.
///
/// A pause is `floor(uniform[0, max)) + min` whole seconds, so it always lies in
/// `[min, min + max)`. With `max == 0` the pause is exactly `min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jitter {
    min: u64,
    max: u64,
}

impl Jitter {
    #[must_use]
    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn min_secs(self) -> u64 {
        self.min
    }

    #[must_use]
    pub fn max_secs(self) -> u64 {
        self.max
    }

    pub fn sample_secs<R: Rng + ?Sized>(self, rng: &mut R) -> u64 {
        let spread = if self.max == 0 {
            0
        } else {
            rng.random_range(0..self.max)
        };
        spread.saturating_add(self.min)
    }

    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> Duration {
        Duration::from_secs(self.sample_secs(rng))
    }
}
