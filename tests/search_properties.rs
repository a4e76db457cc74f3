//! Integration tests for the testable properties and concrete scenarios: black-box, driving the
//! public `corvid::engine`/`corvid::search` surface the way a command loop would.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use corvid::board::fen;
use corvid::engine::transposition::TranspositionTable;
use corvid::search::clock::Clock;
use corvid::search::context::SearchContext;
use corvid::search::history_table::HistoryTable;
use corvid::search::search::{alphabeta, iterative_deepening};
use corvid::search::{INFINITY, MATE_THRESHOLD};

fn fresh_context<'a>(tt: &'a mut TranspositionTable, history: &'a mut HistoryTable) -> SearchContext<'a> {
    SearchContext::new(tt, history, Clock::infinite(Arc::new(AtomicBool::new(false))))
}

#[test]
fn s1_opening_returns_a_legal_move_with_a_non_mate_score() {
    let mut board = fen::build_board(fen::STARTING_FEN).unwrap();
    let mut tt = TranspositionTable::new(4);
    let mut history = HistoryTable::default();
    let mut ctx = fresh_context(&mut tt, &mut history);
    let (best, score) = iterative_deepening(&mut board, &mut ctx, 4, Instant::now(), |_| {});
    assert!(board.generate_legal_moves().contains(best));
    assert!(score.abs() < MATE_THRESHOLD);
}

#[test]
fn s2_mate_in_one_is_delivered() {
    let mut board = fen::build_board("6k1/5ppp/8/8/8/8/5PPP/4R1K1 w - - 0 1").unwrap();
    let mut tt = TranspositionTable::new(4);
    let mut history = HistoryTable::default();
    let mut ctx = fresh_context(&mut tt, &mut history);
    let (best, score) = iterative_deepening(&mut board, &mut ctx, 3, Instant::now(), |_| {});
    assert!(score > MATE_THRESHOLD);
    assert!(board.make_move(best));
    assert!(board.in_check());
    assert!(board.generate_legal_moves().is_empty());
}

#[test]
fn s3_stalemate_scores_zero() {
    let mut board = fen::build_board("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    let mut tt = TranspositionTable::new(4);
    let mut history = HistoryTable::default();
    let mut ctx = fresh_context(&mut tt, &mut history);
    assert!(board.generate_legal_moves().is_empty());
    assert!(!board.in_check());
    let score = alphabeta(&mut board, &mut ctx, -INFINITY, INFINITY, 1, 0, false);
    assert_eq!(score, 0);
}

#[test]
fn s4_threefold_repetition_forces_a_draw_score() {
    let mut board = fen::build_board(fen::STARTING_FEN).unwrap();
    for lan in ["g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1", "f6g8"] {
        let mv = board.generate_legal_moves().iter().find(|m| m.to_lan() == lan).unwrap();
        board.make_move(mv);
    }
    assert!(board.is_draw());
    let mut tt = TranspositionTable::new(4);
    let mut history = HistoryTable::default();
    let mut ctx = fresh_context(&mut tt, &mut history);
    let score = alphabeta(&mut board, &mut ctx, -INFINITY, INFINITY, 3, 0, false);
    assert_eq!(score, 0);
}

#[test]
fn s6_cancellation_returns_quickly_with_a_legal_move() {
    let mut board = fen::build_board(fen::STARTING_FEN).unwrap();
    let mut tt = TranspositionTable::new(4);
    let mut history = HistoryTable::default();
    let stopped = Arc::new(AtomicBool::new(false));
    let clock = Clock::until(Instant::now() + Duration::from_millis(5), Arc::clone(&stopped));
    let mut ctx = SearchContext::new(&mut tt, &mut history, clock);
    let start = Instant::now();
    let (best, _score) = iterative_deepening(&mut board, &mut ctx, 64, start, |_| {});
    assert!(start.elapsed() < Duration::from_millis(200));
    assert!(board.generate_legal_moves().contains(best));
}

#[test]
fn property_fail_hard_bound_holds_across_several_positions() {
    let fens = [
        fen::STARTING_FEN,
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    ];
    for fen_str in fens {
        let mut board = fen::build_board(fen_str).unwrap();
        let mut tt = TranspositionTable::new(4);
        let mut history = HistoryTable::default();
        let mut ctx = fresh_context(&mut tt, &mut history);
        let score = alphabeta(&mut board, &mut ctx, -500, 500, 3, 0, false);
        assert!((-500..=500).contains(&score), "score {score} escaped [-500, 500] for {fen_str}");
    }
}

#[test]
fn property_transposition_hit_reproduces_the_exact_score_without_descending() {
    let mut board = fen::build_board(fen::STARTING_FEN).unwrap();
    let mut tt = TranspositionTable::new(4);
    let mut history = HistoryTable::default();

    let first_score = {
        let mut ctx = fresh_context(&mut tt, &mut history);
        alphabeta(&mut board, &mut ctx, -INFINITY, INFINITY, 4, 0, false)
    };

    let entry = tt.probe(board.hash_key(), 0).expect("depth-4 search must have recorded an entry");
    assert_eq!(entry.depth, 4);
    assert_eq!(entry.value, first_score);

    let mut ctx = fresh_context(&mut tt, &mut history);
    let second_score = alphabeta(&mut board, &mut ctx, -INFINITY, INFINITY, 2, 0, false);
    assert_eq!(second_score, first_score);
}

#[test]
fn property_history_stays_within_history_max_after_many_cutoffs() {
    use corvid::search::history_table::{HistoryTable, HISTORY_MAX};
    use corvid::types::pieces::{Color, PieceName};
    use corvid::types::square::Square;

    let mut history = HistoryTable::default();
    for _ in 0..5_000 {
        history.update(Color::White, PieceName::Bishop, Square(12), 15);
    }
    for color in Color::iter() {
        for piece in PieceName::iter() {
            for sq in 0..64u8 {
                let score = history.score(color, piece, Square(sq));
                assert!(score.abs() <= HISTORY_MAX);
            }
        }
    }
}
