//! Messages exchanged with the host and the external bullet integrator.
//!
//! Note: In Bevy 0.18, buffered events use the `Message` trait instead of `Event`.

use bevy::ecs::message::Message;
use bevy::prelude::*;

/// Request to fire one bullet from a weapon.
///
/// # Fields
/// * `weapon` - Entity carrying the [`WeaponProfile`](crate::components::WeaponProfile)
/// * `physical_origin` - Where the simulated bullet starts (usually the screen centre)
/// * `visual_origin` - Where the cosmetic bullet appears (usually the muzzle)
/// * `aim_direction` - Direction to fire in, recoil already applied; need not be normalized
/// * `right_axis` - The weapon's right vector, axis of the zero-angle rotation
/// * `zero_angle_degrees` - Zeroing correction; `None` uses the weapon's
///   [`WeaponZeroing`](crate::components::WeaponZeroing) or no correction
/// * `visual` - Optional cosmetic instance handed through to the integrator
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_weapon_ballistics::events::FireCommand;
///
/// let command = FireCommand::new(Entity::PLACEHOLDER, Vec3::new(0.0, 1.6, 0.0), Vec3::NEG_Z)
///     .with_visual_origin(Vec3::new(0.2, 1.4, -0.5))
///     .with_zero_angle(359.9);
/// ```
#[derive(Message, Clone, Debug, PartialEq)]
pub struct FireCommand {
    /// Weapon entity
    pub weapon: Entity,
    /// Simulation start point
    pub physical_origin: Vec3,
    /// Cosmetic spawn point
    pub visual_origin: Vec3,
    /// Aim direction
    pub aim_direction: Vec3,
    /// Weapon right vector
    pub right_axis: Vec3,
    /// Zeroing correction (degrees)
    pub zero_angle_degrees: Option<f32>,
    /// Cosmetic instance
    pub visual: Option<Entity>,
}

impl FireCommand {
    /// Creates a command with the visual origin equal to the physical one,
    /// `Vec3::X` as right axis and no explicit zero angle.
    pub fn new(weapon: Entity, origin: Vec3, aim_direction: Vec3) -> Self {
        Self {
            weapon,
            physical_origin: origin,
            visual_origin: origin,
            aim_direction,
            right_axis: Vec3::X,
            zero_angle_degrees: None,
            visual: None,
        }
    }

    /// Sets the cosmetic spawn point.
    pub fn with_visual_origin(mut self, visual_origin: Vec3) -> Self {
        self.visual_origin = visual_origin;
        self
    }

    /// Sets the axis the zero angle rotates around.
    pub fn with_right_axis(mut self, right_axis: Vec3) -> Self {
        self.right_axis = right_axis;
        self
    }

    /// Sets an explicit zero angle in degrees.
    pub fn with_zero_angle(mut self, degrees: f32) -> Self {
        self.zero_angle_degrees = Some(degrees);
        self
    }

    /// Attaches a cosmetic instance to the shot.
    pub fn with_visual(mut self, visual: Entity) -> Self {
        self.visual = Some(visual);
        self
    }
}

/// One fired bullet, handed to the per-frame integrator.
///
/// Built only by [`ShotFactory`](crate::shot::ShotFactory) and never changed
/// afterwards, so the fields are read through accessors. `source_weapon` is
/// an id for damage attribution; it does not keep the weapon alive and the
/// weapon does not own the bullet.
#[derive(Message, Clone, Debug, PartialEq)]
pub struct BulletData {
    pub(crate) source_weapon: Entity,
    pub(crate) physical_origin: Vec3,
    pub(crate) visual_offset: Vec3,
    pub(crate) direction: Vec3,
    pub(crate) lifetime: f32,
    pub(crate) speed: f32,
    pub(crate) visual: Option<Entity>,
}

impl BulletData {
    /// Weapon that fired the bullet.
    pub fn source_weapon(&self) -> Entity {
        self.source_weapon
    }

    /// Simulation start position.
    pub fn physical_origin(&self) -> Vec3 {
        self.physical_origin
    }

    /// Offset from the physical to the cosmetic spawn point.
    pub fn visual_offset(&self) -> Vec3 {
        self.visual_offset
    }

    /// Cosmetic spawn point.
    pub fn visual_origin(&self) -> Vec3 {
        self.physical_origin + self.visual_offset
    }

    /// Initial direction including zeroing; not necessarily unit length.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Seconds until the bullet despawns.
    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }

    /// Initial speed (m/s) including muzzle jitter.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Initial velocity, normalizing the direction first.
    pub fn velocity(&self) -> Vec3 {
        self.direction.normalize_or_zero() * self.speed
    }

    /// Cosmetic instance, if any.
    pub fn visual(&self) -> Option<Entity> {
        self.visual
    }
}
