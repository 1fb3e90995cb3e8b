//! Benchmark for drop estimation and shot construction.

use bevy::prelude::*;
use bevy_weapon_ballistics::drag::{bullet_drop, DropParameters};
use bevy_weapon_ballistics::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn benchmark_bullet_drop(c: &mut Criterion) {
    let params = DropParameters::default();

    let mut group = c.benchmark_group("Bullet Drop");

    for use_drag in [false, true] {
        group.bench_with_input(BenchmarkId::from_parameter(use_drag), &use_drag, |b, &use_drag| {
            b.iter(|| {
                for step in 1..=100 {
                    let distance = step as f32 * 10.0;
                    let _ = bullet_drop(black_box(distance), use_drag, &params);
                }
            });
        });
    }

    group.finish();
}

fn benchmark_shot_factory(c: &mut Criterion) {
    let settings = BallisticSettings::default();
    let profile = match WeaponProfile::default().configured(&settings) {
        Ok(profile) => profile,
        Err(err) => panic!("default profile rejected: {err}"),
    };
    let zero_angle = profile
        .zeroing_correction_angle(100.0, true, &settings)
        .unwrap_or(0.0);

    let command = FireCommand::new(Entity::PLACEHOLDER, Vec3::new(0.0, 1.6, 0.0), Vec3::NEG_Z)
        .with_visual_origin(Vec3::new(0.2, 1.4, -0.5))
        .with_zero_angle(zero_angle);

    let mut group = c.benchmark_group("Shot Factory");

    for shot_count in [100_usize, 1000, 10000].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(shot_count),
            shot_count,
            |b, &count| {
                let mut rng = StdRng::seed_from_u64(12345);
                let mut tracked = Vec::with_capacity(count);
                b.iter(|| {
                    tracked.clear();
                    let factory = ShotFactory::new(&profile);
                    for _ in 0..count {
                        let _ = factory.fire(&command, &mut rng, &mut tracked);
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_bullet_drop, benchmark_shot_factory);
criterion_main!(benches);
