//! Firing system - turns queued fire commands into bullet messages.

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::components::{WeaponProfile, WeaponZeroing};
use crate::error::{BallisticsError, Result};
use crate::events::{BulletData, FireCommand};
use crate::resources::ShotRng;
use crate::shot::ShotFactory;
use crate::types::{BulletTracker, RandomSource};

/// Fire every queued command and emit the resulting bullets.
///
/// Rejected commands are logged and dropped; nothing is emitted for them.
///
/// # Arguments
/// * `fire_commands` - Incoming fire requests
/// * `weapons` - Weapon profiles and optional zeroing
/// * `rng` - Shared jitter source
/// * `bullets` - Outgoing bullets for the integrator
pub fn fire_weapons(
    mut fire_commands: MessageReader<FireCommand>,
    weapons: Query<(&WeaponProfile, Option<&WeaponZeroing>)>,
    mut rng: ResMut<ShotRng>,
    mut bullets: MessageWriter<BulletData>,
) {
    for command in fire_commands.read() {
        if let Err(err) = fire_command(command, &weapons, &mut rng.0, &mut bullets) {
            warn!("shot from weapon {} rejected: {err}", command.weapon);
        }
    }
}

/// Resolve the zero angle for `command` and fire it.
fn fire_command<R, T>(
    command: &FireCommand,
    weapons: &Query<(&WeaponProfile, Option<&WeaponZeroing>)>,
    rng: &mut R,
    tracker: &mut T,
) -> Result<BulletData>
where
    R: RandomSource + ?Sized,
    T: BulletTracker + ?Sized,
{
    let (profile, zeroing) = weapons
        .get(command.weapon)
        .map_err(|_| BallisticsError::UnknownWeapon(command.weapon))?;

    let zero_angle = match (command.zero_angle_degrees, zeroing) {
        (Some(angle), _) => angle,
        (None, Some(zeroing)) => zeroing.correction_degrees.ok_or_else(|| {
            BallisticsError::Configuration(format!(
                "weapon zeroing at {} m has no valid correction",
                zeroing.distance
            ))
        })?,
        (None, None) => 0.0,
    };

    let resolved = command.clone().with_zero_angle(zero_angle);
    ShotFactory::new(profile).fire(&resolved, rng, tracker)
}
