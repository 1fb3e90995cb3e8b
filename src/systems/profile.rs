//! Profile upkeep - keeps cached drag factors and zeroing angles current.

use bevy::prelude::*;

use crate::components::{WeaponProfile, WeaponZeroing};
use crate::resources::BallisticSettings;

/// Recompute drag factors of weapons whose inputs changed.
///
/// Runs before firing so no shot or zeroing estimate sees a factor computed
/// from old diameter, mass, drag coefficient or air density.
///
/// # Arguments
/// * `settings` - Shared ballistic settings (air density)
/// * `weapons` - Query for weapon profiles
pub fn refresh_drag_factors(
    settings: Res<BallisticSettings>,
    mut weapons: Query<(Entity, &mut WeaponProfile)>,
) {
    let settings_changed = settings.is_changed();

    for (entity, mut profile) in weapons.iter_mut() {
        if !settings_changed && !profile.is_changed() {
            continue;
        }
        if profile.is_drag_factor_current(&settings) {
            continue;
        }

        if let Err(err) = profile.recalculate(&settings) {
            error!("weapon {entity} has an unusable profile: {err}");
        }
    }
}

/// Update zeroing corrections after the profile, zeroing distance or settings change.
///
/// # Arguments
/// * `settings` - Shared ballistic settings (air density, gravity)
/// * `weapons` - Query for weapons with a zeroing component
pub fn update_weapon_zeroing(
    settings: Res<BallisticSettings>,
    mut weapons: Query<(Entity, Ref<WeaponProfile>, &mut WeaponZeroing)>,
) {
    let settings_changed = settings.is_changed();

    for (entity, profile, mut zeroing) in weapons.iter_mut() {
        if !settings_changed && !profile.is_changed() && !zeroing.is_changed() {
            continue;
        }

        match zeroing.recompute(&profile, &settings) {
            Ok(angle) => debug!(
                "weapon {entity} zeroed at {} m: correction {angle:.4} deg",
                zeroing.distance
            ),
            Err(err) => warn!("weapon {entity} cannot be zeroed: {err}"),
        }
    }
}
