//! Weapon components for the ballistics system.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::drag::{self, DropParameters};
use crate::error::{BallisticsError, Result};
use crate::resources::BallisticSettings;

/// Inputs the cached drag factor was computed from.
#[derive(Clone, Copy, Debug, PartialEq)]
struct DragCache {
    diameter: f32,
    bullet_mass: f32,
    drag_coefficient: f32,
    air_density: f32,
    factor: f32,
}

/// Physical bullet configuration of one weapon.
///
/// The profile is edited at configuration time (inspector, data file or
/// builder methods) and read by every shot. It also caches the drag factor
/// `0.5 * ρ * A * Cd / m`; call [`WeaponProfile::recalculate`] after changing
/// diameter, mass or drag coefficient, or after the settings' air density
/// changes. [`BallisticsCorePlugin`](crate::BallisticsCorePlugin) does this
/// automatically for profiles living in the ECS.
///
/// # Fields
/// * `muzzle_damage` - Damage a bullet carries when it leaves the barrel
/// * `max_bullet_speed` - Nominal muzzle speed (m/s)
/// * `random_speed_offset` - Width of the muzzle speed jitter band (m/s),
///   centred on `max_bullet_speed`
/// * `bullet_mass` - Bullet mass (kg)
/// * `diameter` - Bullet diameter (m)
/// * `drag_coefficient` - Dimensionless drag coefficient (sphere ≈ 0.5)
/// * `lifetime_seconds` - Time before a fired bullet despawns (s)
///
/// # Example
/// ```
/// use bevy_weapon_ballistics::components::WeaponProfile;
/// use bevy_weapon_ballistics::resources::BallisticSettings;
///
/// let rifle = WeaponProfile::default()
///     .with_max_speed(850.0)
///     .with_mass(0.0095)
///     .configured(&BallisticSettings::default())
///     .unwrap();
/// assert!(rifle.precomputed_drag_factor().is_some());
/// ```
#[derive(Component, Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct WeaponProfile {
    /// Damage at the muzzle
    pub muzzle_damage: f32,
    /// Nominal muzzle speed (m/s)
    pub max_bullet_speed: f32,
    /// Full width of the speed jitter band (m/s)
    pub random_speed_offset: f32,
    /// Bullet mass (kg)
    pub bullet_mass: f32,
    /// Bullet diameter (m)
    pub diameter: f32,
    /// Drag coefficient (Cd)
    pub drag_coefficient: f32,
    /// Bullet lifetime (seconds)
    pub lifetime_seconds: f32,
    #[reflect(ignore)]
    #[serde(skip)]
    drag_cache: Option<DragCache>,
}

impl Default for WeaponProfile {
    /// Creates a profile for a typical 10 mm, 6.5 g bullet.
    ///
    /// Default values:
    /// - Muzzle damage: 80
    /// - Muzzle speed: 550 m/s with a 10 m/s jitter band (±5 m/s)
    /// - Mass: 6.5 g, diameter: 10 mm, drag coefficient: 0.4
    /// - Lifetime: 6 seconds
    ///
    /// The drag factor is not computed yet.
    fn default() -> Self {
        Self {
            muzzle_damage: 80.0,
            max_bullet_speed: 550.0,
            random_speed_offset: 10.0,
            bullet_mass: 0.0065,
            diameter: 0.01,
            drag_coefficient: 0.4,
            lifetime_seconds: 6.0,
            drag_cache: None,
        }
    }
}

impl WeaponProfile {
    /// Sets the nominal muzzle speed (m/s).
    pub fn with_max_speed(mut self, speed: f32) -> Self {
        self.max_bullet_speed = speed;
        self
    }

    /// Sets the width of the muzzle speed jitter band (m/s). Zero disables jitter.
    pub fn with_speed_offset(mut self, offset: f32) -> Self {
        self.random_speed_offset = offset;
        self
    }

    /// Sets the bullet mass (kg).
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.bullet_mass = mass;
        self
    }

    /// Sets the bullet diameter (m).
    pub fn with_diameter(mut self, diameter: f32) -> Self {
        self.diameter = diameter;
        self
    }

    /// Sets the drag coefficient.
    pub fn with_drag(mut self, drag_coefficient: f32) -> Self {
        self.drag_coefficient = drag_coefficient;
        self
    }

    /// Sets the bullet lifetime (seconds).
    pub fn with_lifetime(mut self, seconds: f32) -> Self {
        self.lifetime_seconds = seconds;
        self
    }

    /// Sets the muzzle damage.
    pub fn with_damage(mut self, damage: f32) -> Self {
        self.muzzle_damage = damage;
        self
    }

    /// Validates the profile and computes its drag factor in one step.
    ///
    /// Use this at setup time so a broken profile fails before the first shot.
    pub fn configured(mut self, settings: &BallisticSettings) -> Result<Self> {
        self.recalculate(settings)?;
        Ok(self)
    }

    /// Checks every physical constant of the profile.
    ///
    /// # Returns
    /// A [`BallisticsError::Configuration`] naming the first bad field
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("max_bullet_speed", self.max_bullet_speed),
            ("bullet_mass", self.bullet_mass),
            ("diameter", self.diameter),
            ("lifetime_seconds", self.lifetime_seconds),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(BallisticsError::Configuration(format!(
                    "{name} must be finite and greater than zero, got {value}"
                )));
            }
        }

        let non_negative = [
            ("random_speed_offset", self.random_speed_offset),
            ("drag_coefficient", self.drag_coefficient),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(BallisticsError::Configuration(format!(
                    "{name} must be finite and not negative, got {value}"
                )));
            }
        }

        // Slowest jittered shot is max - offset / 2.
        if self.random_speed_offset >= 2.0 * self.max_bullet_speed {
            return Err(BallisticsError::Configuration(format!(
                "random_speed_offset {} allows non-positive speeds for max_bullet_speed {}",
                self.random_speed_offset, self.max_bullet_speed
            )));
        }

        if !self.muzzle_damage.is_finite() {
            return Err(BallisticsError::Configuration(format!(
                "muzzle_damage must be finite, got {}",
                self.muzzle_damage
            )));
        }
        Ok(())
    }

    /// Recomputes the cached drag factor from the current fields and settings.
    ///
    /// On failure the cache is cleared, so a stale factor is never left behind.
    ///
    /// # Returns
    /// The new drag factor (1/m)
    pub fn recalculate(&mut self, settings: &BallisticSettings) -> Result<f32> {
        self.drag_cache = None;
        settings.validate()?;
        self.validate()?;

        let area = drag::frontal_area(self.diameter)?;
        let factor = drag::precomputed_drag_factor(
            settings.air_density,
            area,
            self.drag_coefficient,
            self.bullet_mass,
        )?;

        self.drag_cache = Some(DragCache {
            diameter: self.diameter,
            bullet_mass: self.bullet_mass,
            drag_coefficient: self.drag_coefficient,
            air_density: settings.air_density,
            factor,
        });
        debug!("weapon drag factor recomputed: {factor:.6e} 1/m");
        Ok(factor)
    }

    /// Last computed drag factor, `None` before the first successful
    /// [`recalculate`](Self::recalculate).
    ///
    /// The value may be stale; see [`is_drag_factor_current`](Self::is_drag_factor_current).
    pub fn precomputed_drag_factor(&self) -> Option<f32> {
        self.drag_cache.map(|cache| cache.factor)
    }

    /// Whether the cached drag factor matches the profile's fields and `settings`.
    pub fn is_drag_factor_current(&self, settings: &BallisticSettings) -> bool {
        self.drag_cache.is_some_and(|cache| {
            cache.diameter == self.diameter
                && cache.bullet_mass == self.bullet_mass
                && cache.drag_coefficient == self.drag_coefficient
                && cache.air_density == settings.air_density
        })
    }

    /// Cached drag factor, refusing to hand out a stale one.
    pub fn current_drag_factor(&self, settings: &BallisticSettings) -> Result<f32> {
        match self.drag_cache {
            Some(cache) if self.is_drag_factor_current(settings) => Ok(cache.factor),
            Some(_) => Err(BallisticsError::Configuration(
                "drag factor is stale, recalculate the weapon profile".to_string(),
            )),
            None => Err(BallisticsError::Configuration(
                "drag factor has not been computed".to_string(),
            )),
        }
    }

    /// Cross-sectional area of the bullet (m²).
    pub fn frontal_area(&self) -> Result<f32> {
        drag::frontal_area(self.diameter)
    }

    /// Drop-model inputs for this bullet under `settings`.
    pub fn drop_parameters(&self, settings: &BallisticSettings) -> DropParameters {
        DropParameters {
            diameter: self.diameter,
            drag_coefficient: self.drag_coefficient,
            bullet_mass: self.bullet_mass,
            max_speed: self.max_bullet_speed,
            air_density: settings.air_density,
            gravity: settings.downward_gravity(),
        }
    }

    /// Time (s) for this bullet to cover `distance` meters.
    pub fn flight_time(&self, distance: f32, use_drag: bool, settings: &BallisticSettings) -> Result<f32> {
        drag::flight_time(distance, use_drag, &self.drop_parameters(settings))
    }

    /// Drop (m) of this bullet after `distance` meters.
    pub fn bullet_drop(&self, distance: f32, use_drag: bool, settings: &BallisticSettings) -> Result<f32> {
        drag::bullet_drop(distance, use_drag, &self.drop_parameters(settings))
    }

    /// Zeroing correction (degrees, near 360) for a target at `distance` meters.
    ///
    /// Feeds this bullet's drop at `distance` into
    /// [`drag::zeroing_correction_angle_degrees`].
    pub fn zeroing_correction_angle(
        &self,
        distance: f32,
        use_drag: bool,
        settings: &BallisticSettings,
    ) -> Result<f32> {
        let drop = self.bullet_drop(distance, use_drag, settings)?;
        drag::zeroing_correction_angle_degrees(distance, drop)
    }
}

/// Component for weapon zeroing (sight adjustment).
///
/// Stores the distance the weapon is zeroed at and the resulting correction
/// angle. Fire commands that do not carry their own zero angle use
/// `correction_degrees`.
///
/// # Fields
/// * `distance` - The distance in meters at which the weapon is zeroed
/// * `use_drag` - Whether the drop estimate accounts for air drag
/// * `correction_degrees` - Last computed correction, `None` until computed
///   or when the zeroing distance is invalid
///
/// # Example
/// ```
/// use bevy_weapon_ballistics::components::{WeaponProfile, WeaponZeroing};
/// use bevy_weapon_ballistics::resources::BallisticSettings;
///
/// let mut zeroing = WeaponZeroing::new(200.0);
/// let angle = zeroing
///     .recompute(&WeaponProfile::default(), &BallisticSettings::default())
///     .unwrap();
/// assert!(angle < 360.0);
/// ```
#[derive(Component, Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct WeaponZeroing {
    /// Zeroed distance in meters
    pub distance: f32,
    /// Account for drag when estimating drop
    pub use_drag: bool,
    /// Calculated correction (degrees)
    #[serde(skip)]
    pub correction_degrees: Option<f32>,
}

impl Default for WeaponZeroing {
    /// Zeroed at 100 meters with drag, correction not yet computed.
    fn default() -> Self {
        Self {
            distance: 100.0,
            use_drag: true,
            correction_degrees: None,
        }
    }
}

impl WeaponZeroing {
    /// Zeroing at `distance` meters with drag enabled.
    pub fn new(distance: f32) -> Self {
        Self {
            distance,
            ..Default::default()
        }
    }

    /// Enables or disables drag in the drop estimate.
    pub fn with_drag(mut self, use_drag: bool) -> Self {
        self.use_drag = use_drag;
        self
    }

    /// Recomputes the correction for `profile` under `settings`.
    ///
    /// Clears the stored correction when the computation fails.
    pub fn recompute(&mut self, profile: &WeaponProfile, settings: &BallisticSettings) -> Result<f32> {
        self.correction_degrees = None;
        let angle = profile.zeroing_correction_angle(self.distance, self.use_drag, settings)?;
        self.correction_degrees = Some(angle);
        Ok(angle)
    }
}
