//! Shot factory - turns a fire command into a [`BulletData`].

use bevy::prelude::*;

use crate::components::WeaponProfile;
use crate::error::{ensure_finite, BallisticsError, Result};
use crate::events::{BulletData, FireCommand};
use crate::types::{BulletTracker, RandomSource};

/// Builds bullets for one weapon profile.
///
/// The factory only reads the profile. Shot speed and direction come from the
/// profile and the command; the drag factor is left to the integrator.
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_weapon_ballistics::prelude::*;
/// use rand::SeedableRng;
///
/// let profile = WeaponProfile::default();
/// let mut rng = rand::rngs::StdRng::seed_from_u64(3);
/// let mut tracked = Vec::new();
///
/// let command = FireCommand::new(Entity::PLACEHOLDER, Vec3::ZERO, Vec3::NEG_Z);
/// let bullet = ShotFactory::new(&profile)
///     .fire(&command, &mut rng, &mut tracked)
///     .unwrap();
///
/// assert_eq!(tracked, vec![bullet]);
/// ```
pub struct ShotFactory<'a> {
    profile: &'a WeaponProfile,
}

impl<'a> ShotFactory<'a> {
    pub fn new(profile: &'a WeaponProfile) -> Self {
        Self { profile }
    }

    /// Fires one bullet and hands it to `tracker`.
    ///
    /// A missing `zero_angle_degrees` on the command means no correction.
    /// Nothing is emitted when the profile or the command is invalid.
    ///
    /// # Arguments
    /// * `command` - Origins, aim, right axis and zero angle of the shot
    /// * `rng` - Source for muzzle speed jitter
    /// * `tracker` - Receiver of the finished bullet
    ///
    /// # Returns
    /// A copy of the bullet that was emitted
    pub fn fire<R, T>(&self, command: &FireCommand, rng: &mut R, tracker: &mut T) -> Result<BulletData>
    where
        R: RandomSource + ?Sized,
        T: BulletTracker + ?Sized,
    {
        self.profile.validate()?;

        let physical_origin = ensure_finite_vector("physical_origin", command.physical_origin)?;
        let visual_origin = ensure_finite_vector("visual_origin", command.visual_origin)?;
        let zero_angle = ensure_finite("zero_angle_degrees", command.zero_angle_degrees.unwrap_or(0.0))?;

        let direction = apply_zero_angle(command.aim_direction, command.right_axis, zero_angle)?;
        let speed = self.resolve_speed(rng)?;

        let bullet = BulletData {
            source_weapon: command.weapon,
            physical_origin,
            visual_offset: visual_origin - physical_origin,
            direction,
            lifetime: self.profile.lifetime_seconds,
            speed,
            visual: command.visual,
        };

        debug!(
            "bullet fired from {}: speed {:.2} m/s, direction {}",
            bullet.source_weapon, bullet.speed, bullet.direction
        );
        tracker.track(bullet.clone());
        Ok(bullet)
    }

    /// Muzzle speed with jitter, uniform in `max ± offset / 2`.
    pub fn resolve_speed<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Result<f32> {
        let max_speed = self.profile.max_bullet_speed;
        let offset = self.profile.random_speed_offset;
        if offset == 0.0 {
            return Ok(max_speed);
        }
        Ok(max_speed + rng.uniform(offset)? - offset * 0.5)
    }
}

/// Rotates `aim` around `right_axis` by the zeroing angle (degrees, taken modulo 360).
///
/// Angles use the left-handed sense the zeroing formula was written for: a
/// positive angle about the right axis pitches the aim down, so the
/// `360 - θ` correction from [`zeroing_correction_angle_degrees`] pitches it
/// up by `θ`. A zero angle returns `aim` untouched, and `right_axis` is then
/// only checked for NaN/infinite components.
///
/// [`zeroing_correction_angle_degrees`]: crate::drag::zeroing_correction_angle_degrees
pub fn apply_zero_angle(aim: Vec3, right_axis: Vec3, zero_angle_degrees: f32) -> Result<Vec3> {
    let aim = ensure_finite_vector("aim_direction", aim)?;
    if aim.length_squared() == 0.0 {
        return Err(BallisticsError::InvalidVector {
            name: "aim_direction",
            reason: "must not be zero length",
        });
    }
    let right_axis = ensure_finite_vector("right_axis", right_axis)?;

    let angle = ensure_finite("zero_angle_degrees", zero_angle_degrees)?.rem_euclid(360.0);
    if angle == 0.0 {
        return Ok(aim);
    }

    let axis = right_axis.try_normalize().ok_or(BallisticsError::InvalidVector {
        name: "right_axis",
        reason: "must not be zero length when a zero angle is applied",
    })?;
    // Bevy is right-handed, so the left-handed angle is negated.
    Ok(Quat::from_axis_angle(axis, -angle.to_radians()) * aim)
}

fn ensure_finite_vector(name: &'static str, value: Vec3) -> Result<Vec3> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(BallisticsError::InvalidVector {
            name,
            reason: "components must be finite",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Returns the same fraction of the bound on every draw.
    struct FixedFraction(f32);

    impl RandomSource for FixedFraction {
        fn uniform(&mut self, upper: f32) -> Result<f32> {
            Ok(upper * self.0)
        }
    }

    fn command() -> FireCommand {
        FireCommand::new(Entity::PLACEHOLDER, Vec3::new(0.0, 1.6, 0.0), Vec3::NEG_Z)
            .with_visual_origin(Vec3::new(0.25, 1.4, -0.6))
    }

    #[test]
    fn test_fire_builds_bullet_from_profile() {
        let profile = WeaponProfile::default().with_speed_offset(0.0).with_lifetime(4.0);
        let mut tracked = Vec::new();
        let bullet = ShotFactory::new(&profile)
            .fire(&command(), &mut FixedFraction(0.5), &mut tracked)
            .unwrap();

        assert_eq!(bullet.source_weapon(), Entity::PLACEHOLDER);
        assert_eq!(bullet.physical_origin(), Vec3::new(0.0, 1.6, 0.0));
        assert!((bullet.visual_offset() - Vec3::new(0.25, -0.2, -0.6)).length() < 1e-6);
        assert_eq!(bullet.direction(), Vec3::NEG_Z);
        assert_eq!(bullet.lifetime(), 4.0);
        assert_eq!(bullet.speed(), 550.0);
        assert_eq!(bullet.visual(), None);
        assert_eq!(tracked.len(), 1);
        assert_eq!(tracked[0], bullet);
    }

    #[test]
    fn test_zero_offset_ignores_random_source() {
        let profile = WeaponProfile::default().with_speed_offset(0.0);
        let factory = ShotFactory::new(&profile);
        for fraction in [0.0, 0.25, 0.999_999] {
            let mut tracked = Vec::new();
            let bullet = factory
                .fire(&command(), &mut FixedFraction(fraction), &mut tracked)
                .unwrap();
            assert_eq!(bullet.speed(), profile.max_bullet_speed);
        }

        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..100 {
            assert_eq!(factory.resolve_speed(&mut rng).unwrap(), profile.max_bullet_speed);
        }
    }

    #[test]
    fn test_jitter_band_edges() {
        let profile = WeaponProfile::default().with_speed_offset(10.0);
        let factory = ShotFactory::new(&profile);
        assert_eq!(factory.resolve_speed(&mut FixedFraction(0.0)).unwrap(), 545.0);
        assert_eq!(factory.resolve_speed(&mut FixedFraction(0.5)).unwrap(), 550.0);
        assert!(factory.resolve_speed(&mut FixedFraction(0.999_999)).unwrap() <= 555.0);
    }

    #[test]
    fn test_resolve_speed_rejects_unusable_offset() {
        let mut profile = WeaponProfile::default();
        profile.random_speed_offset = f32::NAN;
        let mut rng = StdRng::seed_from_u64(5);
        assert!(matches!(
            ShotFactory::new(&profile).resolve_speed(&mut rng),
            Err(BallisticsError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_jitter_is_uniform_within_band() {
        let profile = WeaponProfile::default().with_speed_offset(20.0);
        let factory = ShotFactory::new(&profile);
        let mut rng = StdRng::seed_from_u64(2024);

        let low = profile.max_bullet_speed - 10.0;
        let high = profile.max_bullet_speed + 10.0;
        let mut buckets = [0_u32; 4];
        let trials = 20_000;

        for _ in 0..trials {
            let speed = factory.resolve_speed(&mut rng).unwrap();
            assert!((low..=high).contains(&speed), "speed {speed} outside band");
            let bucket = (((speed - low) / 5.0) as usize).min(3);
            buckets[bucket] += 1;
        }

        // Each quarter of the band should see roughly a quarter of the shots.
        for count in buckets {
            let share = count as f32 / trials as f32;
            assert!((share - 0.25).abs() < 0.03, "bucket share {share}");
        }
    }

    #[test]
    fn test_zero_angle_leaves_direction_untouched() {
        let aim = Vec3::new(0.3, -0.2, -2.0);
        assert_eq!(apply_zero_angle(aim, Vec3::X, 0.0).unwrap(), aim);
        assert_eq!(apply_zero_angle(aim, Vec3::X, 360.0).unwrap(), aim);
        // Right axis is irrelevant without a rotation.
        assert_eq!(apply_zero_angle(aim, Vec3::ZERO, 0.0).unwrap(), aim);

        let profile = WeaponProfile::default();
        let shot = command().with_zero_angle(0.0);
        let mut tracked = Vec::new();
        let bullet = ShotFactory::new(&profile)
            .fire(&shot, &mut StdRng::seed_from_u64(5), &mut tracked)
            .unwrap();
        assert_eq!(bullet.direction(), Vec3::NEG_Z);
    }

    #[test]
    fn test_zero_angle_rotates_around_right_axis() {
        let rotated = apply_zero_angle(Vec3::NEG_Z, Vec3::X, 90.0).unwrap();
        assert!((rotated - Vec3::NEG_Y).length() < 1e-5);

        // 360 - x is the same rotation as -x, and pitches the aim up.
        let wrapped = apply_zero_angle(Vec3::NEG_Z, Vec3::X, 359.0).unwrap();
        let negative = apply_zero_angle(Vec3::NEG_Z, Vec3::X, -1.0).unwrap();
        assert!((wrapped - negative).length() < 1e-5);
        assert!(wrapped.x.abs() < 1e-6);
        assert!((wrapped.y - 1.0_f32.to_radians().sin()).abs() < 1e-5);
        assert!((wrapped.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_zeroing_correction_raises_aim() {
        let profile = WeaponProfile::default();
        let settings = crate::resources::BallisticSettings::default();
        let drop = profile.bullet_drop(200.0, true, &settings).unwrap();
        let angle = profile.zeroing_correction_angle(200.0, true, &settings).unwrap();

        let corrected = apply_zero_angle(Vec3::NEG_Z, Vec3::X, angle).unwrap();
        // Aim rises by drop over distance.
        assert!(corrected.y > 0.0);
        assert!((corrected.y / -corrected.z - drop / 200.0).abs() < 1e-5);
    }

    #[test]
    fn test_rotation_requires_right_axis() {
        let result = apply_zero_angle(Vec3::NEG_Z, Vec3::ZERO, 359.9);
        assert!(matches!(
            result,
            Err(BallisticsError::InvalidVector { name: "right_axis", .. })
        ));
    }

    #[test]
    fn test_malformed_command_is_not_emitted() {
        let profile = WeaponProfile::default();
        let factory = ShotFactory::new(&profile);
        let mut tracked = Vec::new();

        let mut nan_origin = command();
        nan_origin.physical_origin.x = f32::NAN;
        let mut nan_visual = command();
        nan_visual.visual_origin.y = f32::NAN;
        let mut nan_aim = command();
        nan_aim.aim_direction.z = f32::NAN;
        let zero_aim = FireCommand::new(Entity::PLACEHOLDER, Vec3::ZERO, Vec3::ZERO);
        let nan_angle = command().with_zero_angle(f32::NAN);

        for bad in [nan_origin, nan_visual, nan_aim, zero_aim, nan_angle] {
            let result = factory.fire(&bad, &mut FixedFraction(0.5), &mut tracked);
            assert!(result.is_err_and(|err| err.is_invalid_input()));
        }
        assert!(tracked.is_empty());
    }

    #[test]
    fn test_invalid_profile_is_rejected_before_emission() {
        let profile = WeaponProfile::default().with_mass(0.0);
        let mut tracked = Vec::new();
        let result = ShotFactory::new(&profile).fire(&command(), &mut FixedFraction(0.5), &mut tracked);
        assert!(matches!(result, Err(BallisticsError::Configuration(_))));
        assert!(tracked.is_empty());
    }

    #[test]
    fn test_visual_handle_passes_through() {
        let profile = WeaponProfile::default();
        let visual = World::new().spawn_empty().id();
        let shot = command().with_visual(visual);
        let mut tracked = Vec::new();
        let bullet = ShotFactory::new(&profile)
            .fire(&shot, &mut FixedFraction(0.1), &mut tracked)
            .unwrap();
        assert_eq!(bullet.visual(), Some(visual));
    }
}
