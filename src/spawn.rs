//! Spawn context for particle initialization.
//!
//! Wraps a seeded RNG with the two distributions the field needs: uniform
//! positions inside a box and uniform velocities inside the unit cube.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Seeded random source used once, at scene setup.
pub struct SpawnContext {
    rng: SmallRng,
}

impl SpawnContext {
    /// Create a context from an explicit seed, or from the clock when `None`.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42)
        });

        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Random f32 in the given range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        self.rng.gen_range(min..max)
    }

    /// Uniform point in an origin-centred box of the given full size.
    pub fn random_in_box(&mut self, extents: Vec3) -> Vec3 {
        let half = extents * 0.5;
        Vec3::new(
            self.random_range(-half.x, half.x),
            self.random_range(-half.y, half.y),
            self.random_range(-half.z, half.z),
        )
    }

    /// Velocity with each component uniform in `[-1, 1)`.
    pub fn random_velocity(&mut self) -> Vec3 {
        Vec3::new(
            self.random_range(-1.0, 1.0),
            self.random_range(-1.0, 1.0),
            self.random_range(-1.0, 1.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_in_box_bounds() {
        let mut ctx = SpawnContext::new(Some(7));
        let extents = Vec3::new(450.0, 800.0, 450.0);
        for _ in 0..1000 {
            let p = ctx.random_in_box(extents);
            assert!(p.x >= -225.0 && p.x < 225.0);
            assert!(p.y >= -400.0 && p.y < 400.0);
            assert!(p.z >= -225.0 && p.z < 225.0);
        }
    }

    #[test]
    fn test_random_velocity_bounds() {
        let mut ctx = SpawnContext::new(Some(7));
        for _ in 0..1000 {
            let v = ctx.random_velocity();
            assert!(v.abs().max_element() <= 1.0);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SpawnContext::new(Some(99));
        let mut b = SpawnContext::new(Some(99));
        for _ in 0..10 {
            assert_eq!(a.random_velocity(), b.random_velocity());
        }
    }
}
