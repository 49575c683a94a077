//! Criterion benchmarks measure time of move generation and perft calculation.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use patzer::chess::game::Game;
use shakmaty::{CastlingMode, Chess, Position as ShakmatyPosition};

const POSITIONS: [&str; 6] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
];

fn movegen_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("Move generation");
    let mut games: Vec<Game> = POSITIONS
        .iter()
        .map(|fen| Game::from_fen(fen).unwrap())
        .collect();
    group.throughput(criterion::Throughput::Elements(games.len() as u64));
    group.bench_function("movegen_patzer", |b| {
        b.iter(|| {
            for game in &mut games {
                std::hint::black_box(game.legal_moves());
            }
        });
    });
    // shakmaty is a reasonable reference with stable performance. A mailbox
    // generator will not outrun its bitboards; the reference point is still
    // useful for tracking regressions.
    let shakmaty_positions: Vec<Chess> = POSITIONS
        .iter()
        .map(|fen| {
            let setup: shakmaty::fen::Fen = fen.parse().unwrap();
            setup.into_position(CastlingMode::Standard).unwrap()
        })
        .collect();
    group.throughput(criterion::Throughput::Elements(
        shakmaty_positions.len() as u64
    ));
    group.bench_function("movegen_reference_shakmaty", |b| {
        b.iter(|| {
            for position in &shakmaty_positions {
                std::hint::black_box(position.legal_moves());
            }
        });
    });
    group.finish();
}

criterion_group! {
    name = movegen;
    config = Criterion::default().sample_size(100);
    targets = movegen_bench
}

// This acts both as performance and correctness test.
fn perft_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    for (fen, depth, nodes) in [
        // Position 1.
        ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 4, 197_281),
        // Position 2 ("kiwipete").
        (
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            3,
            97_862,
        ),
        // Position 3.
        ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 4, 43_238),
        // Position 6.
        (
            "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
            3,
            89_890,
        ),
    ] {
        let mut game = Game::from_fen(fen).unwrap();
        group.throughput(criterion::Throughput::Elements(nodes));
        group.bench_with_input(
            BenchmarkId::new("perft", format!("position {fen}, depth {depth}")),
            &depth,
            |b, &depth| {
                b.iter(|| {
                    assert_eq!(game.perft(depth), nodes);
                });
            },
        );
    }
    group.finish();
}

criterion_group! {
    name = perft;
    config = Criterion::default().sample_size(10);
    targets = perft_bench
}

criterion_main!(movegen, perft);
