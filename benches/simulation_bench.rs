use collide2d::{
    Body, BroadPhaseKind, Circle, NarrowPhaseKind, PhysicsWorld, Polygon, Vec2, WorldConfig,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const FRAME_MILLIS: f64 = 16.0;
const FRAMES: usize = 30;

fn ground() -> Body {
    Body::kinematic(Polygon::rectangle(2000.0, 40.0).unwrap(), Vec2::new(1000.0, 1000.0))
}

// --- Helper for a pile of falling circles ---
fn run_circle_pile(world: &mut PhysicsWorld, num_circles: usize) {
    let radius = 10.0;
    for i in 0..num_circles {
        let col = (i % 40) as f64;
        let row = (i / 40) as f64;
        let position = Vec2::new(100.0 + col * 2.2 * radius, 900.0 - row * 2.2 * radius);
        world.add(Body::dynamic(Circle::new(radius).unwrap(), position));
    }
    for _ in 0..FRAMES {
        world.step(black_box(FRAME_MILLIS));
    }
}

// --- Helper for a pile of mixed polygons ---
fn run_polygon_pile(world: &mut PhysicsWorld, num_polygons: usize) {
    for i in 0..num_polygons {
        let col = (i % 30) as f64;
        let row = (i / 30) as f64;
        let position = Vec2::new(100.0 + col * 50.0, 900.0 - row * 50.0);
        let polygon = match i % 3 {
            0 => Polygon::rectangle(30.0, 20.0),
            1 => Polygon::regular(5, 15.0),
            _ => Polygon::regular(3, 18.0),
        };
        world.add(Body::dynamic(polygon.unwrap(), position).with_angular_velocity(0.5));
    }
    for _ in 0..FRAMES {
        world.step(black_box(FRAME_MILLIS));
    }
}

fn bench_circle_pile(c: &mut Criterion) {
    let mut group = c.benchmark_group("circle_pile");

    for broad_phase in [
        BroadPhaseKind::AllPairs,
        BroadPhaseKind::SweepAndPrune,
        BroadPhaseKind::SpatialHash { cell_size: 32.0 },
    ] {
        for num_circles in [50, 200].iter() {
            let id = BenchmarkId::new(format!("{broad_phase:?}"), num_circles);
            group.bench_with_input(id, num_circles, |b, &n| {
                b.iter(|| {
                    let config = WorldConfig { broad_phase, strict: false, ..WorldConfig::default() };
                    let mut world = PhysicsWorld::with_config(config).unwrap();
                    world.add(ground());
                    run_circle_pile(&mut world, black_box(n));
                });
            });
        }
    }
    group.finish();
}

fn bench_polygon_pile(c: &mut Criterion) {
    let mut group = c.benchmark_group("polygon_pile");

    for narrow_phase in [NarrowPhaseKind::Sat, NarrowPhaseKind::GjkEpa] {
        group.bench_with_input(BenchmarkId::from_parameter(format!("{narrow_phase:?}")), &90, |b, &n| {
            b.iter(|| {
                let config = WorldConfig {
                    narrow_phase,
                    broad_phase: BroadPhaseKind::SweepAndPrune,
                    strict: false,
                    ..WorldConfig::default()
                };
                let mut world = PhysicsWorld::with_config(config).unwrap();
                world.add(ground());
                run_polygon_pile(&mut world, black_box(n));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_circle_pile, bench_polygon_pile);
criterion_main!(benches);
