use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use set_engine::cards::{Card, Deck, DeckScope};
use set_engine::core::GameRng;
use set_engine::rules::MatchEngine;

fn dealt_field(seed: u64, len: usize) -> Vec<Card> {
    let mut rng = GameRng::new(seed);
    let scope = DeckScope::generate();
    Deck::shuffled(Some(scope), &mut rng).draw_many(len)
}

fn bench_match_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_search");

    for len in [12usize, 15, 21] {
        let field = dealt_field(7, len);

        group.bench_with_input(BenchmarkId::new("first_match", len), &field, |b, field| {
            b.iter(|| MatchEngine::first_match(black_box(field)));
        });
        group.bench_with_input(BenchmarkId::new("all_matches", len), &field, |b, field| {
            b.iter(|| MatchEngine::all_matches(black_box(field)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_match_search);
criterion_main!(benches);
