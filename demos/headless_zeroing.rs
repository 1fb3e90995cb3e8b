use bevy::app::ScheduleRunnerPlugin;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;
use bevy_weapon_ballistics::prelude::*;
use std::time::Duration;

fn main() {
    println!("Starting headless zeroing demo...");
    println!("Fires one zeroed and one unzeroed shot, then flies them to 100 m.");

    App::new()
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / 60.0))))
        .insert_resource(ShotRng::from_seed(2024))
        .add_plugins(BallisticsCorePlugin)
        .init_resource::<TriggerPulled>()
        .add_systems(Startup, setup_weapons)
        .add_systems(Update, (pull_triggers, receive_bullets, fly_bullets).chain())
        .run();
}

/// Stand-in for the external integrator: one in-flight bullet.
#[derive(Component)]
struct FlyingBullet {
    start: Vec3,
    velocity: Vec3,
    age: f32,
    lifetime: f32,
    label: &'static str,
}

#[derive(Component)]
struct Label(&'static str);

#[derive(Resource, Default)]
struct TriggerPulled(bool);

fn setup_weapons(mut commands: Commands) {
    let profile = WeaponProfile::default().with_speed_offset(0.0);

    commands.spawn((profile.clone(), WeaponZeroing::new(100.0), Label("zeroed")));
    commands.spawn((profile, Label("unzeroed")));
}

fn pull_triggers(
    mut pulled: ResMut<TriggerPulled>,
    weapons: Query<Entity, With<WeaponProfile>>,
    mut fire_commands: MessageWriter<FireCommand>,
) {
    if pulled.0 {
        return;
    }
    for weapon in weapons.iter() {
        fire_commands.write(FireCommand::new(weapon, Vec3::new(0.0, 1.5, 0.0), Vec3::NEG_Z));
    }
    pulled.0 = true;
}

fn receive_bullets(
    mut commands: Commands,
    mut bullets: MessageReader<BulletData>,
    labels: Query<&Label>,
) {
    for bullet in bullets.read() {
        let label = labels.get(bullet.source_weapon()).map(|l| l.0).unwrap_or("unknown");
        println!(
            "[FIRED] {label}: {:.1} m/s, direction {:.5}",
            bullet.speed(),
            bullet.direction()
        );
        commands.spawn((
            FlyingBullet {
                start: bullet.physical_origin(),
                velocity: bullet.velocity(),
                age: 0.0,
                lifetime: bullet.lifetime(),
                label,
            },
            Transform::from_translation(bullet.physical_origin()),
        ));
    }
}

fn fly_bullets(
    mut commands: Commands,
    time: Res<Time>,
    settings: Res<BallisticSettings>,
    mut bullets: Query<(Entity, &mut FlyingBullet, &mut Transform)>,
    remaining: Query<(), With<FlyingBullet>>,
    mut started: Local<bool>,
) {
    // Fixed substeps keep the toy integrator independent of frame timing.
    const SUBSTEPS: u32 = 20;
    let dt = time.delta_secs() / SUBSTEPS as f32;

    for (entity, mut bullet, mut transform) in bullets.iter_mut() {
        *started = true;
        for _ in 0..SUBSTEPS {
            bullet.velocity += settings.gravity * dt;
            transform.translation += bullet.velocity * dt;
        }
        bullet.age += time.delta_secs();

        let downrange = (transform.translation.z - bullet.start.z).abs();
        if downrange >= 100.0 {
            println!(
                "[CHECKPOINT] {} at {:.1} m: height change {:+.4} m",
                bullet.label,
                downrange,
                transform.translation.y - bullet.start.y
            );
            commands.entity(entity).despawn();
        } else if bullet.age > bullet.lifetime {
            commands.entity(entity).despawn();
        }
    }

    if *started && remaining.is_empty() {
        println!("[FINISHED] Demo complete.");
        std::process::exit(0);
    }
}
