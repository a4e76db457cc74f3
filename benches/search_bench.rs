use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use corvid::board::fen;
use corvid::engine::transposition::TranspositionTable;
use corvid::search::clock::Clock;
use corvid::search::context::SearchContext;
use corvid::search::history_table::HistoryTable;
use corvid::search::search::iterative_deepening;

use criterion::{criterion_group, criterion_main, Criterion};

fn bench_search(c: &mut Criterion) {
    let startpos = fen::build_board(fen::STARTING_FEN).unwrap();
    let kiwipete =
        fen::build_board("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();

    c.bench_function("search_depth_4_startpos", |b| {
        b.iter(|| {
            let mut board = startpos.clone();
            let mut tt = TranspositionTable::new(16);
            let mut history = HistoryTable::default();
            let mut ctx = SearchContext::new(&mut tt, &mut history, Clock::infinite(Arc::new(AtomicBool::new(false))));
            iterative_deepening(&mut board, &mut ctx, 4, std::time::Instant::now(), |_| {})
        })
    });

    c.bench_function("search_depth_4_kiwipete", |b| {
        b.iter(|| {
            let mut board = kiwipete.clone();
            let mut tt = TranspositionTable::new(16);
            let mut history = HistoryTable::default();
            let mut ctx = SearchContext::new(&mut tt, &mut history, Clock::infinite(Arc::new(AtomicBool::new(false))));
            iterative_deepening(&mut board, &mut ctx, 4, std::time::Instant::now(), |_| {})
        })
    });
}

fn bench_movegen(c: &mut Criterion) {
    let startpos = fen::build_board(fen::STARTING_FEN).unwrap();
    c.bench_function("movegen_startpos", |b| {
        b.iter(|| {
            let mut board = startpos.clone();
            board.generate_legal_moves().len()
        })
    });
}

criterion_group!(benches, bench_search, bench_movegen);
criterion_main!(benches);
