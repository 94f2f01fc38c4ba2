//! Collision benchmark: Measure pairwise and queued collision checks.
//!
//! Target: < 50µs for a full scan of 100 sprites

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stagecraft::{CollisionDetector, Position, SpriteId};

fn scattered(count: usize) -> Vec<(SpriteId, Position)> {
    (0..count)
        .map(|i| {
            let x = (i * 37 % 100) as f64;
            let y = (i * 61 % 100) as f64;
            (SpriteId::new(format!("sprite-{i}")), Position::new(x, y))
        })
        .collect()
}

fn distance_check(c: &mut Criterion) {
    let detector = CollisionDetector::default();
    let a = Position::new(50.0, 50.0);
    let b = Position::new(55.0, 52.0);

    c.bench_function("is_colliding", |bench| {
        bench.iter(|| detector.is_colliding(black_box(a), black_box(b)))
    });
}

fn all_pairs_scan(c: &mut Criterion) {
    let detector = CollisionDetector::default();
    let mut group = c.benchmark_group("colliding_pairs");

    for count in [10, 50, 100] {
        let sprites = scattered(count);
        let bodies: Vec<_> = sprites.iter().map(|(id, pos)| (id, *pos)).collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &bodies, |bench, bodies| {
            bench.iter(|| detector.colliding_pairs(black_box(bodies)))
        });
    }

    group.finish();
}

fn single_subject_scan(c: &mut Criterion) {
    let detector = CollisionDetector::default();
    let sprites = scattered(100);
    let bodies: Vec<_> = sprites.iter().map(|(id, pos)| (id, *pos)).collect();
    let subject = sprites[0].0.clone();

    c.bench_function("colliding_with_100", |bench| {
        bench.iter(|| detector.colliding_with(black_box(&subject), black_box(&bodies)))
    });
}

criterion_group!(benches, distance_check, all_pairs_scan, single_subject_scan);
criterion_main!(benches);
