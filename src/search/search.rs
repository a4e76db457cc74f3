//! The alpha-beta driver (component E) and the iterative deepener that drives it (component F).
//! Everything here is fail-hard: every return value is clamped to the `[alpha, beta]` window it
//! was called with.

use crate::board::board::Board;
use crate::engine::transposition::EntryFlag;
use crate::moves::moves::Move;

use super::context::SearchContext;
use super::ordering::sort_moves;
use super::quiescence::quiesce;
use super::{INFINITY, MATE_EVAL, MATE_THRESHOLD};

/// Below `depth > 3` null-move pruning is skipped outright regardless of material.
const NULL_MOVE_MIN_DEPTH: i32 = 3;
/// Non-pawn material (in [`crate::eval::game_phase`] units) below which null-move pruning is
/// disabled, since zugzwang-prone endgames make the null-move assumption ("doing nothing is
/// never best") unsound.
const ENDGAME_MATERIAL_NMP: i32 = 4;
const ASPIRATION_WINDOW: i32 = 50;

/// One completed iteration's report, handed to the controller-supplied progress sink.
pub struct SearchProgress<'a> {
    pub depth: i32,
    pub sel_depth: usize,
    pub nodes: u64,
    pub elapsed_ms: u128,
    pub score: i32,
    pub pv: &'a [Move],
}

fn null_move_reduction(depth: i32) -> i32 {
    3 + depth / 6
}

fn late_move_reduction(depth: i32, moves_tried: i32, is_pv: bool) -> i32 {
    let base = (((depth - 1) as f64).sqrt() + ((moves_tried - 1) as f64).sqrt()).floor() as i32;
    let reduced = if is_pv { (2 * base) / 3 } else { base };
    reduced.min(depth - 1).max(0)
}

/// Negamax with principal-variation search, null-move pruning, late-move reductions, and
/// mate-distance pruning. `allow_null` forbids a null move right after one was just tried (and,
/// per the root call in [`iterative_deepening`], forbids it at the root outright).
#[allow(clippy::too_many_arguments)]
pub fn alphabeta(
    board: &mut Board,
    ctx: &mut SearchContext,
    mut alpha: i32,
    mut beta: i32,
    depth: i32,
    ply: usize,
    allow_null: bool,
) -> i32 {
    ctx.nodes += 1;

    if ctx.should_stop() {
        return 0;
    }

    ctx.pv.clear_frame(ply);

    alpha = alpha.max(-MATE_EVAL + ply as i32);
    beta = beta.min(MATE_EVAL - ply as i32);
    if alpha >= beta {
        return alpha;
    }

    if board.is_draw() {
        return 0;
    }

    let is_pv = beta - alpha > 1;

    let hash_key = board.hash_key();
    let mut hash_move = Move::NULL;
    if let Some(entry) = ctx.tt.probe(hash_key, ply as i32) {
        hash_move = entry.best_move;
        if entry.depth >= depth {
            let usable = match entry.flag {
                EntryFlag::Exact => true,
                EntryFlag::LowerBound => entry.value >= beta,
                EntryFlag::UpperBound => entry.value <= alpha,
                EntryFlag::None => false,
            };
            if usable && (!is_pv || entry.value > alpha && entry.value < beta) {
                return entry.value;
            }
        }
    }

    let mut moves = board.generate_legal_moves();
    if moves.is_empty() {
        return if board.in_check() { -(MATE_EVAL - ply as i32) } else { 0 };
    }

    if depth <= 0 {
        return quiesce(board, ctx, ply, alpha, beta);
    }

    let in_check = board.in_check();
    let material = crate::eval::game_phase(board);

    if allow_null
        && !is_pv
        && !in_check
        && ply > 0
        && depth > NULL_MOVE_MIN_DEPTH
        && material >= ENDGAME_MATERIAL_NMP
        && crate::eval::evaluate(board) >= beta
    {
        let r = null_move_reduction(depth);
        board.make_move(Move::NULL);
        ctx.stack[ply].played_move = Move::NULL;
        let score = -alphabeta(board, ctx, -beta, -beta + 1, depth - 1 - r, ply + 1, false);
        board.unmake_move();
        if ctx.stopped {
            return 0;
        }
        if score >= beta {
            return beta;
        }
    }

    let pv_move = ctx.pv.move_at(ply);
    let killers = ctx.killers.moves(ply);
    let prev_move = if ply > 0 { ctx.stack[ply - 1].played_move } else { Move::NULL };
    sort_moves(&mut moves, board, pv_move, hash_move, killers, &ctx.history, prev_move);

    let original_alpha = alpha;
    let mut best_move = Move::NULL;
    let mut moves_tried = 0;

    for m in moves.iter() {
        if !board.make_move(m) {
            continue;
        }
        moves_tried += 1;
        ctx.stack[ply].played_move = m;
        let gives_check = board.in_check();

        let score = if moves_tried == 1 {
            -alphabeta(board, ctx, -beta, -alpha, depth - 1, ply + 1, true)
        } else {
            let mut needs_full_search = true;
            let mut candidate = alpha;

            if moves_tried >= 2 && m.is_quiet() && !in_check && !gives_check && depth >= 3 {
                let r = late_move_reduction(depth, moves_tried, is_pv);
                candidate = -alphabeta(board, ctx, -alpha - 1, -alpha, depth - 1 - r, ply + 1, true);
                needs_full_search = candidate > alpha;
            }

            if needs_full_search {
                candidate = -alphabeta(board, ctx, -alpha - 1, -alpha, depth - 1, ply + 1, true);
            }

            if candidate > alpha && candidate < beta {
                candidate = -alphabeta(board, ctx, -beta, -alpha, depth - 1, ply + 1, true);
            }

            candidate
        };

        board.unmake_move();

        if ctx.stopped {
            return 0;
        }

        if score > alpha {
            best_move = m;
            ctx.pv.update(ply, m);

            if score >= beta {
                ctx.tt.record(hash_key, depth, beta, EntryFlag::LowerBound, m, ply as i32);
                if m.is_quiet() {
                    ctx.killers.store(ply, m);
                    ctx.history.update(board.to_move(), m.piece_moving(), m.dest_square(), depth);
                }
                return beta;
            }

            alpha = score;
        }
    }

    let flag = if alpha > original_alpha { EntryFlag::Exact } else { EntryFlag::UpperBound };
    ctx.tt.record(hash_key, depth, alpha, flag, best_move, ply as i32);

    alpha
}

/// Renders a raw centipawn/mate score into the UCI-adjacent wire format: `mate ±k` if the score
/// encodes forced mate, otherwise `cp <score>`. The score passed in is side-to-move relative; any
/// re-signing to white's perspective is the caller's job (see [`crate::engine::format_info`]).
pub fn score_string(score: i32) -> String {
    if score.abs() > MATE_THRESHOLD {
        let plies_to_mate = MATE_EVAL - score.abs();
        let moves_to_mate = (plies_to_mate + 1) / 2;
        let signed = if score > 0 { moves_to_mate } else { -moves_to_mate };
        format!("mate {signed}")
    } else {
        format!("cp {score}")
    }
}

/// Iterative deepening with aspiration windows. `max_depth` bounds how deep the loop will go if
/// time never runs out; `on_progress` is called once per completed (non-aspiration-failed)
/// iteration.
pub fn iterative_deepening(
    board: &mut Board,
    ctx: &mut SearchContext,
    max_depth: i32,
    start: std::time::Instant,
    mut on_progress: impl FnMut(SearchProgress),
) -> (Move, i32) {
    ctx.prepare_for_new_search();

    let mut alpha = -INFINITY;
    let mut beta = INFINITY;
    let mut eval = 0;
    let mut depth = 1;

    while depth <= max_depth {
        let score = alphabeta(board, ctx, alpha, beta, depth, 0, false);

        if ctx.stopped {
            break;
        }

        if score <= alpha || score >= beta {
            alpha = -INFINITY;
            beta = INFINITY;
            continue;
        }

        eval = score;
        alpha = eval - ASPIRATION_WINDOW;
        beta = eval + ASPIRATION_WINDOW;

        on_progress(SearchProgress {
            depth,
            sel_depth: ctx.sel_depth,
            nodes: ctx.nodes,
            elapsed_ms: start.elapsed().as_millis(),
            score: eval,
            pv: ctx.pv.root_line(),
        });

        depth += 1;
    }

    (ctx.tt.best_move(board.hash_key()), eval)
}
