use criterion::{black_box, criterion_group, criterion_main, Criterion};
use elastic_collision::collision::{momentum_angle_free, momentum_trigonometry, Collider, ResolverOptions};
use elastic_collision::core::SimulationConfig;
use elastic_collision::{PhysicsWorld, Vector2};

fn colliders() -> (Collider, Collider) {
    let c1 = Collider::new(Vector2::new(0.707, 0.707), 1.0, Vector2::new(0.0, 0.0)).unwrap();
    let c2 = Collider::new(Vector2::new(-0.707, -0.707), 2.0, Vector2::new(1.4142, 1.4142)).unwrap();
    (c1, c2)
}

fn bench_resolvers(c: &mut Criterion) {
    let (c1, c2) = colliders();
    let options = ResolverOptions::default();

    c.bench_function("momentum_trigonometry", |b| {
        b.iter(|| momentum_trigonometry(black_box(&c1), black_box(&c2), options))
    });
    c.bench_function("momentum_angle_free", |b| {
        b.iter(|| momentum_angle_free(black_box(&c1), black_box(&c2), options))
    });
}

fn bench_world_tick(c: &mut Criterion) {
    let config = SimulationConfig {
        seed: Some(1),
        ..SimulationConfig::default()
    };
    let mut world = PhysicsWorld::with_config(config).unwrap();
    for _ in 0..100 {
        world.spawn_random_body(Vector2::new(20.0, 20.0), 2.0, 10.0).unwrap();
    }

    c.bench_function("tick_100_bodies", |b| b.iter(|| world.tick(black_box(1.0 / 60.0))));
}

criterion_group!(benches, bench_resolvers, bench_world_tick);
criterion_main!(benches);
