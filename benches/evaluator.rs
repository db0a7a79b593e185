use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use holdem_round::cards::{parse_cards, Card};
use holdem_round::deck::Deck;
use holdem_round::evaluator::{best_hand, get_rank};

fn five(s: &str) -> [Card; 5] {
    let v = parse_cards(s).expect("bench hands are valid");
    [v[0], v[1], v[2], v[3], v[4]]
}

fn bench_get_rank(c: &mut Criterion) {
    let mut g = c.benchmark_group("get_rank");
    for (name, cards) in [
        ("high_card", "Ah Kd 7s 5c 2d"),
        ("full_house", "2s 2h 2d 5c 5d"),
        ("wheel", "As 2h 3d 4c 5s"),
        ("royal_flush", "Ts Js Qs Ks As"),
    ] {
        let hand = five(cards);
        g.bench_with_input(BenchmarkId::from_parameter(name), &hand, |b, input| {
            b.iter(|| get_rank(black_box(input)))
        });
    }
    g.finish();
}

fn bench_best_hand(c: &mut Criterion) {
    let mut g = c.benchmark_group("best_hand");
    let deck = Deck::standard().shuffled_seeded(2024);
    for n in 5..=7 {
        let cards = &deck.as_slice()[..n];
        g.bench_with_input(BenchmarkId::new("cards", n), cards, |b, input| {
            b.iter(|| best_hand(black_box(input)))
        });
    }
    g.finish();
}

criterion_group!(benches, bench_get_rank, bench_best_hand);
criterion_main!(benches);
