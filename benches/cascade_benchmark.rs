//! Benchmarks for the board engine and headless games.
//!
//! Covers the hot paths of a turn: match scanning, hint search, and whole
//! games driven by the greedy policy.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use orbclash::autoplay::play_game;
use orbclash::game::{find_matches, productive_swaps};
use orbclash::{Board, GameConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bench_find_matches(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_matches");
    for side in [6usize, 16, 64] {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        // Runs shorter than six are allowed, so threes are common.
        let board = Board::generate(side, side, 3, 6, &mut rng);
        group.bench_with_input(BenchmarkId::from_parameter(side), &board, |b, board| {
            b.iter(|| black_box(find_matches(black_box(board), 3)));
        });
    }
    group.finish();
}

fn bench_generate(c: &mut Criterion) {
    c.bench_function("generate_5x6", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        b.iter(|| black_box(Board::generate(5, 6, 6, 3, &mut rng)));
    });
}

fn bench_hints(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let board = Board::generate(5, 6, 6, 3, &mut rng);
    c.bench_function("productive_swaps_5x6", |b| {
        b.iter(|| black_box(productive_swaps(black_box(&board), 3)));
    });
}

fn bench_autoplay_game(c: &mut Criterion) {
    let config = GameConfig::default();
    c.bench_function("autoplay_100_turns", |b| {
        b.iter(|| black_box(play_game(config, black_box(42), 100).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_find_matches,
    bench_generate,
    bench_hints,
    bench_autoplay_game
);
criterion_main!(benches);
