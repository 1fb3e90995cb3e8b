//! Drag model - closed-form drop and zeroing math for a single bullet.
//!
//! Everything in here is a pure function of its arguments. The drag factor
//! used by [`flight_time`] is the same quantity a [`WeaponProfile`] caches:
//!
//! `k = 0.5 * ρ * A * Cd / m` with `A = π * (d / 2)²`
//!
//! which is also `ρ * Cd * π * (d / 2)² / (2m)`.
//!
//! [`WeaponProfile`]: crate::components::WeaponProfile

use std::f32::consts::PI;

use crate::error::{ensure_finite, ensure_non_negative, ensure_positive, BallisticsError, Result};

/// Drag factors below this are treated as "no drag".
///
/// `(exp(k * x) - 1) / k` is a removable singularity at `k = 0`; below the
/// threshold the limit `x` is used directly.
pub const DRAG_EPSILON: f32 = 1.0e-9;

/// Physical inputs to [`flight_time`] and [`bullet_drop`].
///
/// # Fields
/// * `diameter` - Bullet diameter in meters
/// * `drag_coefficient` - Dimensionless drag coefficient (Cd)
/// * `bullet_mass` - Bullet mass in kilograms
/// * `max_speed` - Muzzle speed in meters per second
/// * `air_density` - Air density in kg/m³
/// * `gravity` - Downward gravitational acceleration in m/s² (positive = down)
///
/// # Example
/// ```
/// use bevy_weapon_ballistics::drag::{bullet_drop, DropParameters};
///
/// let params = DropParameters {
///     max_speed: 800.0,
///     ..Default::default()
/// };
/// let drop = bullet_drop(300.0, true, &params).unwrap();
/// assert!(drop > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropParameters {
    pub diameter: f32,
    pub drag_coefficient: f32,
    pub bullet_mass: f32,
    pub max_speed: f32,
    pub air_density: f32,
    pub gravity: f32,
}

impl Default for DropParameters {
    /// A 10 mm, 6.5 g bullet at 550 m/s in 1.22 kg/m³ air under 9.81 m/s².
    fn default() -> Self {
        Self {
            diameter: 0.01,
            drag_coefficient: 0.4,
            bullet_mass: 0.0065,
            max_speed: 550.0,
            air_density: 1.22,
            gravity: 9.81,
        }
    }
}

impl DropParameters {
    /// Drag factor `k` for these parameters.
    ///
    /// # Returns
    /// `k` in 1/m, or an error if diameter or mass are not positive
    pub fn drag_factor(&self) -> Result<f32> {
        let area = frontal_area(self.diameter)?;
        precomputed_drag_factor(self.air_density, area, self.drag_coefficient, self.bullet_mass)
    }
}

/// Cross-sectional area of a round bullet.
///
/// # Arguments
/// * `diameter` - Bullet diameter in meters, must be positive
///
/// # Returns
/// `π * (diameter / 2)²` in square meters
pub fn frontal_area(diameter: f32) -> Result<f32> {
    let radius = ensure_positive("diameter", diameter)? * 0.5;
    Ok(PI * radius * radius)
}

/// Drag constant reused by drop, flight time and the in-flight integrator.
///
/// # Arguments
/// * `air_density` - Air density (kg/m³)
/// * `frontal_area` - Cross-sectional area (m²)
/// * `drag_coefficient` - Dimensionless drag coefficient
/// * `bullet_mass` - Bullet mass (kg), must be positive
///
/// # Returns
/// `0.5 * air_density * frontal_area * drag_coefficient / bullet_mass`
pub fn precomputed_drag_factor(
    air_density: f32,
    frontal_area: f32,
    drag_coefficient: f32,
    bullet_mass: f32,
) -> Result<f32> {
    ensure_positive("bullet_mass", bullet_mass)?;
    ensure_non_negative("air_density", air_density)?;
    ensure_non_negative("frontal_area", frontal_area)?;
    ensure_non_negative("drag_coefficient", drag_coefficient)?;

    Ok(0.5 * air_density * frontal_area * drag_coefficient / bullet_mass)
}

/// Time for the bullet to cover `distance` meters downrange.
///
/// Without drag this is `distance / max_speed`. With drag the bullet slows
/// exponentially with distance, which gives
/// `t = (exp(k * distance) - 1) / (k * max_speed)`.
pub fn flight_time(distance: f32, use_drag: bool, params: &DropParameters) -> Result<f32> {
    let distance = ensure_non_negative("distance", distance)?;
    let max_speed = ensure_positive("max_speed", params.max_speed)?;

    let k = if use_drag { params.drag_factor()? } else { 0.0 };
    let time = if k < DRAG_EPSILON {
        distance / max_speed
    } else {
        (k * distance).exp_m1() / (k * max_speed)
    };

    if !time.is_finite() {
        return Err(BallisticsError::invalid(
            "distance",
            distance,
            "flight time overflows",
        ));
    }
    Ok(time)
}

/// Vertical drop of the bullet after travelling `distance` meters.
///
/// Uses the flight time from [`flight_time`] and a constant downward
/// acceleration: `drop = 0.5 * g * t²`.
///
/// # Arguments
/// * `distance` - Downrange distance in meters, must not be negative
/// * `use_drag` - Whether air drag slows the bullet
/// * `params` - Physical bullet and environment parameters
///
/// # Returns
/// The drop in meters (positive = below the line of departure)
///
/// # Example
/// ```
/// use bevy_weapon_ballistics::drag::{bullet_drop, DropParameters};
///
/// let drop = bullet_drop(100.0, false, &DropParameters::default()).unwrap();
/// assert!((drop - 0.16215).abs() < 1e-4);
/// ```
pub fn bullet_drop(distance: f32, use_drag: bool, params: &DropParameters) -> Result<f32> {
    let time = flight_time(distance, use_drag, params)?;
    let gravity = ensure_finite("gravity", params.gravity)?;

    let drop = 0.5 * gravity * time * time;
    if !drop.is_finite() {
        return Err(BallisticsError::invalid("distance", distance, "bullet drop overflows"));
    }
    Ok(drop)
}

/// Angle (degrees) to tilt the shot so it lands on the aim point at `distance`.
///
/// Returns `360 - atan(drop / distance)` in degrees, i.e. a value just below
/// 360 rather than a small positive pitch. Apply it modulo 360.
///
/// # Arguments
/// * `distance` - Zeroing distance in meters, must not be zero
/// * `drop` - Bullet drop at that distance in meters
pub fn zeroing_correction_angle_degrees(distance: f32, drop: f32) -> Result<f32> {
    let distance = ensure_finite("distance", distance)?;
    let drop = ensure_finite("drop", drop)?;
    if distance == 0.0 {
        return Err(BallisticsError::invalid(
            "distance",
            distance,
            "zeroing distance must not be zero",
        ));
    }

    Ok(360.0 - (drop / distance).atan().to_degrees())
}
