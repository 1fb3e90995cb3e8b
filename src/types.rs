//! Collaborator traits at the edges of the ballistics core.

use bevy::ecs::message::MessageWriter;
use rand::RngCore;
use rand_distr::{Distribution, Uniform};

use crate::error::{BallisticsError, Result};
use crate::events::BulletData;

/// Source of uniform random numbers for muzzle speed jitter.
///
/// Implemented for every `rand` generator. Tests can plug in a fixed
/// sequence to make shots deterministic.
///
/// # Example
/// ```
/// use bevy_weapon_ballistics::types::RandomSource;
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
/// let value = rng.uniform(10.0).unwrap();
/// assert!((0.0..10.0).contains(&value));
/// ```
pub trait RandomSource {
    /// Uniform sample in `[0, upper)`.
    ///
    /// Fails with [`BallisticsError::InvalidArgument`] unless `upper` is
    /// positive and finite.
    fn uniform(&mut self, upper: f32) -> Result<f32>;
}

impl<R: RngCore + ?Sized> RandomSource for R {
    fn uniform(&mut self, upper: f32) -> Result<f32> {
        let distribution = Uniform::new(0.0_f32, upper).map_err(|_| {
            BallisticsError::invalid("upper", upper, "sampling bound must be positive and finite")
        })?;
        Ok(distribution.sample(self))
    }
}

/// Receiver of fired bullets, i.e. the per-frame integrator's queue.
///
/// The factory pushes each bullet exactly once and never reads it back.
pub trait BulletTracker {
    /// Takes ownership of a freshly fired bullet.
    fn track(&mut self, bullet: BulletData);
}

impl BulletTracker for Vec<BulletData> {
    fn track(&mut self, bullet: BulletData) {
        self.push(bullet);
    }
}

impl BulletTracker for MessageWriter<'_, BulletData> {
    fn track(&mut self, bullet: BulletData) {
        self.write(bullet);
    }
}
