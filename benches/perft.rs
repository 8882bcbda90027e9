#[macro_use]
extern crate criterion;
extern crate skewer;

use criterion::Criterion;
use skewer::Position;
use skewer::perft::{perft, perft_leaf_counting, perft_ordered};

fn perft_startpos(c: &mut Criterion) {
    c.bench_function("perft startpos depth 4", |b| {
        b.iter(|| {
            let mut pos = Position::default();
            perft(&mut pos, 4)
        })
    });
    c.bench_function("perft leaf-counting startpos depth 4", |b| {
        b.iter(|| {
            let mut pos = Position::default();
            perft_leaf_counting(&mut pos, 4)
        })
    });
    c.bench_function("perft ordered startpos depth 4", |b| {
        b.iter(|| {
            let mut pos = Position::default();
            perft_ordered(&mut pos, 4)
        })
    });
}

fn perft_middlegame(c: &mut Criterion) {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    c.bench_function("perft middlegame depth 3", |b| {
        b.iter(|| {
            let mut pos = Position::from_fen(fen);
            perft(&mut pos, 3)
        })
    });
}

criterion_group!(benches, perft_startpos, perft_middlegame);
criterion_main!(benches);
