//! Interpreter benchmark: Measure a full play run with no loop delay.
//!
//! Covers thread spawn per sprite, instruction dispatch under the world
//! lock, and the deferred collision drain on every loop tick.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use stagecraft::{Engine, EngineConfig, Instruction, NullHost, Position};
use std::time::Duration;

fn looping_script() -> Vec<Instruction> {
    vec![
        Instruction::say("greet", "hello", 60.0),
        Instruction::repeat("loop", 50),
        Instruction::move_steps("walk", 3.0),
        Instruction::turn("spin", 15.0),
    ]
}

fn engine_with(sprites: usize) -> Engine {
    let config = EngineConfig::default().with_step_delay(Duration::ZERO);
    let engine = Engine::with_config(config, NullHost).unwrap();
    for i in 0..sprites {
        let offset = (i * 13 % 100) as f64;
        engine.register_sprite(
            format!("sprite-{i}"),
            (),
            Position::new(offset, 100.0 - offset),
            looping_script(),
        );
    }
    engine
}

fn play_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("play_all");
    group.sample_size(20);

    for sprites in [1, 4, 16] {
        let engine = engine_with(sprites);
        group.bench_with_input(BenchmarkId::from_parameter(sprites), &engine, |bench, engine| {
            bench.iter(|| engine.play_all().unwrap())
        });
    }

    group.finish();
}

fn straight_line(c: &mut Criterion) {
    let engine = Engine::with_config(EngineConfig::default(), NullHost).unwrap();
    let script: Vec<_> = (0..100)
        .map(|i| Instruction::turn(format!("t{i}"), 3.6))
        .collect();
    engine.register_sprite("solo", (), Position::CENTER, script);

    c.bench_function("play_100_turns", |bench| {
        bench.iter(|| engine.play_all().unwrap())
    });
}

criterion_group!(benches, play_run, straight_line);
criterion_main!(benches);
