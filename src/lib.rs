//! # Bevy Weapon Ballistics
//!
//! Weapon-side ballistics for Bevy 0.18.
//!
//! ## Features
//! - Closed-form bullet drop with optional exponential air drag
//! - Zeroing correction angles for a target distance
//! - Muzzle speed jitter from an injectable random source
//! - Per-shot [`BulletData`](events::BulletData) messages for an external
//!   integrator that advances bullets and detects hits
//!
//! The math in [`drag`] and [`shot`] does not need an `App`; the plugin only
//! keeps cached values current and turns [`FireCommand`](events::FireCommand)
//! messages into bullets.
//!
//! ## Quick Start
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_weapon_ballistics::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(BallisticsCorePlugin)
//!         .run();
//! }
//! ```

pub mod components;
pub mod drag;
pub mod error;
pub mod events;
pub mod resources;
pub mod shot;
pub mod systems;
pub mod types;

pub mod prelude {
    pub use crate::components::*;
    pub use crate::drag::{
        bullet_drop, flight_time, frontal_area, precomputed_drag_factor,
        zeroing_correction_angle_degrees, DropParameters,
    };
    pub use crate::error::{BallisticsError, Result as BallisticsResult};
    pub use crate::events::*;
    pub use crate::resources::*;
    pub use crate::shot::ShotFactory;
    pub use crate::types::*;
    pub use crate::BallisticsCorePlugin;
}

use bevy::prelude::*;

/// Core weapon ballistics plugin.
///
/// Registers the configuration types and messages and schedules, in order:
/// - `refresh_drag_factors` - Recomputes stale drag factors
/// - `update_weapon_zeroing` - Recomputes zeroing corrections
/// - `fire_weapons` - Turns `FireCommand` messages into `BulletData` messages
///
/// `BallisticSettings` and `ShotRng` are only initialized if the app has not
/// inserted its own, so insert a seeded `ShotRng` before adding the plugin
/// for reproducible shots.
pub struct BallisticsCorePlugin;

impl Plugin for BallisticsCorePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<components::WeaponProfile>()
            .register_type::<components::WeaponZeroing>()
            .register_type::<resources::BallisticSettings>()
            .init_resource::<resources::BallisticSettings>()
            .init_resource::<resources::ShotRng>()
            .add_message::<events::FireCommand>()
            .add_message::<events::BulletData>()
            .add_systems(Startup, validate_settings)
            .add_systems(
                Update,
                (
                    systems::profile::refresh_drag_factors,
                    systems::profile::update_weapon_zeroing,
                    systems::firing::fire_weapons,
                )
                    .chain(),
            );
    }
}

/// Report unusable settings once at startup instead of on every shot.
fn validate_settings(settings: Res<resources::BallisticSettings>) {
    if let Err(err) = settings.validate() {
        error!("ballistic settings rejected: {err}");
    }
}
