//! Sampler

use super::RNG;
use crate::geometry::Point2f;
use crate::math::*;

/// Sequential source of uniform sample values for one shading evaluation.
///
/// Draws are strictly ordered; every scattering model documents the order in
/// which it consumes values so that a seeded `RNG` reproduces the same
/// decisions.
pub struct Sampler<'rng> {
    /// The random number generator backing the sampler.
    rng: &'rng mut RNG,
}

impl<'rng> Sampler<'rng> {
    /// Create a new `Sampler`.
    ///
    /// * `rng` - The random number generator backing the sampler.
    pub fn new(rng: &'rng mut RNG) -> Self {
        Self { rng }
    }

    /// Returns the next sample value in `[0, 1)`.
    pub fn next(&mut self) -> Float {
        self.rng.uniform_float()
    }

    /// Returns the next two sample values as a point in `[0, 1)^2`. The x
    /// value is drawn first.
    pub fn next_2d(&mut self) -> Point2f {
        let x = self.next();
        let y = self.next();
        Point2f::new(x, y)
    }

    /// Returns a uniformly distributed index in `[0, n)`.
    ///
    /// * `n` - Number of choices. Must be non-zero.
    pub fn next_index(&mut self, n: usize) -> usize {
        debug_assert!(n > 0 && n <= u32::MAX as usize);
        self.rng.bounded_uniform_u32(n as u32) as usize
    }
}
