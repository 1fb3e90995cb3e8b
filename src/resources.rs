//! Global resources for the ballistics system.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{BallisticsError, Result};

/// Environment shared by every weapon.
///
/// Weapons read the air density from here whenever they rebuild their drag
/// factor, and the drop helpers take gravity from here.
///
/// # Fields
/// * `air_density` - Air density in kg/m³ used for drag
/// * `gravity` - Gravity vector in m/s²; the drop math uses `-gravity.y`
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_weapon_ballistics::resources::BallisticSettings;
///
/// let thin_air = BallisticSettings {
///     air_density: 0.9,
///     ..Default::default()
/// };
/// assert_eq!(thin_air.downward_gravity(), 9.81);
/// ```
#[derive(Resource, Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[reflect(Resource)]
#[serde(default)]
pub struct BallisticSettings {
    /// Air density affecting drag (kg/m³)
    pub air_density: f32,
    /// Gravity vector (m/s²)
    pub gravity: Vec3,
}

impl Default for BallisticSettings {
    /// Air density of 1.22 kg/m³ and 9.81 m/s² gravity pointing down -Y.
    fn default() -> Self {
        Self {
            air_density: 1.22,
            gravity: Vec3::new(0.0, -9.81, 0.0),
        }
    }
}

impl BallisticSettings {
    /// Positive downward acceleration used by the drop formula.
    pub fn downward_gravity(&self) -> f32 {
        -self.gravity.y
    }

    /// Checks that the settings can feed the drag model.
    ///
    /// # Returns
    /// `Ok(())` if air density is finite and not negative and gravity is finite
    pub fn validate(&self) -> Result<()> {
        if !self.air_density.is_finite() || self.air_density < 0.0 {
            return Err(BallisticsError::Configuration(format!(
                "air density must be finite and not negative, got {}",
                self.air_density
            )));
        }
        if !self.gravity.is_finite() {
            return Err(BallisticsError::Configuration(format!(
                "gravity must be finite, got {}",
                self.gravity
            )));
        }
        Ok(())
    }
}

/// Random source used for muzzle speed jitter.
///
/// Seed it with [`ShotRng::from_seed`] for reproducible shots (replays,
/// tests, lockstep netcode); the default pulls a seed from the OS.
#[derive(Resource, Deref, DerefMut)]
pub struct ShotRng(pub StdRng);

impl Default for ShotRng {
    fn default() -> Self {
        Self(StdRng::from_os_rng())
    }
}

impl ShotRng {
    /// Deterministic generator for a given seed.
    pub fn from_seed(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_default_settings() {
        let settings = BallisticSettings::default();
        assert_eq!(settings.air_density, 1.22);
        assert_eq!(settings.downward_gravity(), 9.81);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_validation() {
        let negative = BallisticSettings {
            air_density: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            negative.validate(),
            Err(BallisticsError::Configuration(_))
        ));

        let broken_gravity = BallisticSettings {
            gravity: Vec3::new(0.0, f32::NAN, 0.0),
            ..Default::default()
        };
        assert!(broken_gravity.validate().is_err());

        let vacuum = BallisticSettings {
            air_density: 0.0,
            ..Default::default()
        };
        assert!(vacuum.validate().is_ok());
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = ShotRng::from_seed(42);
        let mut b = ShotRng::from_seed(42);
        for _ in 0..16 {
            assert_eq!(a.random::<u32>(), b.random::<u32>());
        }
    }
}
