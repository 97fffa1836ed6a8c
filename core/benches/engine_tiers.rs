use bluffsweeper_core::*;
use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};

const TIERS: [(&str, GameConfig); 3] = [
    ("beginner", GameConfig::beginner()),
    ("intermediate", GameConfig::intermediate()),
    ("expert", GameConfig::expert()),
];

fn bench_setup(c: &mut Criterion) {
    let mut group = c.benchmark_group("setup");
    for (name, config) in TIERS {
        group.bench_function(name, |b| {
            let mut seed = 0u64;
            b.iter(|| {
                seed += 1;
                black_box(GameEngine::with_seed(config, seed).unwrap())
            })
        });
    }
    group.finish();
}

fn bench_cascade(c: &mut Criterion) {
    let mut group = c.benchmark_group("cascade");
    for (name, config) in TIERS {
        // single mine in a corner so the opposite corner floods the whole board
        let config = GameConfig::new(config.width, config.height, 1);
        let engine = GameEngine::with_generator(
            config,
            &mut FixedMineGenerator::new([Coord::new(0, 0)]),
        )
        .unwrap();
        let target = Coord::new(config.width - 1, config.height - 1);
        group.bench_function(name, |b| {
            b.iter_batched(
                || engine.clone(),
                |mut engine| black_box(engine.click_tile(target).unwrap()),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_setup, bench_cascade);
criterion_main!(benches);
