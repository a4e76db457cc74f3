//! The quiescence extension (component C): once the iterative depth horizon is reached,
//! `alphabeta` hands off here instead of calling `eval::evaluate` directly, so the search never
//! stops mid-exchange and calls a position "quiet" while a piece is hanging.

use crate::board::board::Board;
use crate::eval;
use crate::moves::moves::Move;

use super::context::SearchContext;
use super::ordering::sort_captures;

/// Material phase below which delta pruning is disabled, since in a near-bare-king endgame a
/// "hopeless" capture margin can still flip the game (e.g. a pawn promoting).
const ENDGAME_MATERIAL_Q: i32 = 10;

/// Fail-hard quiescence search: stand-pat cutoff followed by captures and promotions only,
/// narrowed by delta pruning. Returns a score in `[alpha, beta]` exactly like `alphabeta`.
pub fn quiesce(board: &mut Board, ctx: &mut SearchContext, ply: usize, mut alpha: i32, beta: i32) -> i32 {
    ctx.nodes += 1;
    ctx.sel_depth = ctx.sel_depth.max(ply);

    if ctx.should_stop() {
        return 0;
    }
    if board.is_draw() {
        return 0;
    }
    if ply >= super::MAX_PLY - 1 {
        return eval::evaluate(board);
    }

    let stand_pat = eval::evaluate(board);
    if stand_pat >= beta {
        return beta;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }

    let material = eval::game_phase(board);
    let prev_move = if ply > 0 { ctx.stack[ply - 1].played_move } else { Move::NULL };

    let mut moves = board.generate_legal_moves();
    sort_captures(&mut moves, prev_move);

    for m in moves.iter() {
        if !m.is_capture() && m.promotion_piece().is_none() {
            continue;
        }

        let captured_value = m.captured_piece().map_or(0, |p| eval::PIECE_VALUES[p.idx()]);
        let promo_bonus =
            m.promotion_piece().map_or(0, |p| eval::PIECE_VALUES[p.piece_name().idx()] - eval::PIECE_VALUES[0]);
        let delta = stand_pat + captured_value + 200 + promo_bonus;
        let captured_phase_weight = m.captured_piece().map_or(0, eval::phase_weight);
        if delta <= alpha && material - captured_phase_weight >= ENDGAME_MATERIAL_Q {
            continue;
        }

        board.make_move(m);
        ctx.stack[ply].played_move = m;

        let score = -quiesce(board, ctx, ply + 1, -beta, -alpha);
        board.unmake_move();

        if ctx.stopped {
            return 0;
        }

        if score > alpha {
            if score >= beta {
                return beta;
            }
            alpha = score;
        }
    }

    alpha
}

#[cfg(test)]
mod quiescence_tests {
    use super::*;
    use crate::board::fen;
    use crate::engine::transposition::TranspositionTable;
    use crate::search::clock::Clock;
    use crate::search::history_table::HistoryTable;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    fn ctx<'a>(tt: &'a mut TranspositionTable, history: &'a mut HistoryTable) -> SearchContext<'a> {
        SearchContext::new(tt, history, Clock::infinite(Arc::new(AtomicBool::new(false))))
    }

    #[test]
    fn quiet_starting_position_returns_stand_pat() {
        let mut board = fen::build_board(fen::STARTING_FEN).unwrap();
        let mut tt = TranspositionTable::new(1);
        let mut history = HistoryTable::default();
        let mut c = ctx(&mut tt, &mut history);
        let score = quiesce(&mut board, &mut c, 0, -super::super::INFINITY, super::super::INFINITY);
        assert_eq!(score, eval::evaluate(&board));
    }

    #[test]
    fn hanging_queen_capture_is_found() {
        let mut board = fen::build_board("3qk3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        let mut tt = TranspositionTable::new(1);
        let mut history = HistoryTable::default();
        let mut c = ctx(&mut tt, &mut history);
        let score = quiesce(&mut board, &mut c, 0, -super::super::INFINITY, super::super::INFINITY);
        assert!(score > eval::PIECE_VALUES[4] - 50);
    }

    #[test]
    fn checkmate_at_node_entry_scores_as_a_lost_position() {
        // Quiescence has no in-check special case: a checkmated side to move simply finds no
        // capture/promotion that improves on the (very bad) stand-pat evaluation.
        let mut board = fen::build_board("7k/5QQ1/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let mut tt = TranspositionTable::new(1);
        let mut history = HistoryTable::default();
        let mut c = ctx(&mut tt, &mut history);
        let score = quiesce(&mut board, &mut c, 0, -super::super::INFINITY, super::super::INFINITY);
        assert!(score < 0);
    }

    #[test]
    fn quiet_push_promotion_is_searched() {
        // A pawn one step from queening with nothing to capture: spec step 4 is "capture *or
        // promotion*", so this must not be filtered out even though it isn't a capture.
        let mut board = fen::build_board("4k3/4P3/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let mut tt = TranspositionTable::new(1);
        let mut history = HistoryTable::default();
        let mut c = ctx(&mut tt, &mut history);
        let score = quiesce(&mut board, &mut c, 0, -super::super::INFINITY, super::super::INFINITY);
        let stand_pat = eval::evaluate(&board);
        assert!(score > stand_pat, "promotion to a queen must raise alpha above the stand-pat eval");
    }
}
