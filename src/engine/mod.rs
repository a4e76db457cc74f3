//! The controller-facing surface (components outside the search core proper): a `Board` plus a
//! persistent transposition table and the game-position state a UCI-style command loop drives.

pub mod perft;
pub mod transposition;
pub mod uci;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::board::board::Board;
use crate::board::fen;
use crate::moves::moves::Move;
use crate::search::clock::Clock;
use crate::search::context::SearchContext;
use crate::search::game_time::GameTime;
use crate::search::history_table::HistoryTable;
use crate::search::search::{iterative_deepening, score_string, SearchProgress};
use crate::types::pieces::Color;

use transposition::TranspositionTable;

const DEFAULT_TT_SIZE_MB: usize = 16;
const DEFAULT_MAX_DEPTH: i32 = 64;

/// What the controller asked for via `go`: a fixed depth, a fixed move time, a game clock
/// allotment to budget from, or "search until `stop`".
pub enum TimeControl {
    Depth(i32),
    MoveTime(Duration),
    GameTime(GameTime),
    Infinite,
}

/// Ties a position, a persistent transposition table, and the cancellation flag together so a
/// command loop can drive repeated searches without re-deriving any of that state each time.
pub struct Engine {
    board: Board,
    tt: TranspositionTable,
    history: HistoryTable,
    stopped: Arc<AtomicBool>,
    max_depth: i32,
}

impl Engine {
    pub fn new(tt_size_mb: usize) -> Self {
        Self {
            board: fen::build_board(fen::STARTING_FEN).expect("starting FEN is well-formed"),
            tt: TranspositionTable::new(tt_size_mb),
            history: HistoryTable::default(),
            stopped: Arc::new(AtomicBool::new(false)),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_default_table() -> Self {
        Self::new(DEFAULT_TT_SIZE_MB)
    }

    pub fn set_max_depth(&mut self, depth: i32) {
        self.max_depth = depth;
    }

    /// Clears the transposition table and resets the position. Killers are cleared at the start
    /// of every search regardless; history persists across games too, since a stale history
    /// heuristic from a finished game only biases move ordering, it never produces an illegal
    /// or incorrect result.
    pub fn new_game(&mut self) {
        self.tt.clear();
        self.board = fen::build_board(fen::STARTING_FEN).expect("starting FEN is well-formed");
    }

    pub fn set_position(&mut self, fen: &str, moves: &[&str]) -> Result<(), fen::FenError> {
        self.board = fen::build_board(fen)?;
        for lan in moves {
            let legal = self.board.generate_legal_moves();
            let Some(m) = legal.iter().find(|m| &m.to_lan() == lan) else {
                log::warn!("move {lan} is not legal in the current position; ignoring the rest of the list");
                break;
            };
            self.board.make_move(m);
        }
        Ok(())
    }

    /// A copy of the board for commands (`d`, perft) that want to act on the position without
    /// borrowing the engine mutably.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stopped)
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    /// Runs the iterative deepener to completion (or cancellation) and returns `(best_move,
    /// score)`. Plays no move on the board; the caller decides whether/when to apply it.
    pub fn search(&mut self, time_control: TimeControl, mut on_progress: impl FnMut(SearchProgress)) -> (Move, i32) {
        self.stopped.store(false, Ordering::Relaxed);

        let (clock, max_depth) = match time_control {
            TimeControl::Depth(d) => (Clock::infinite(self.stop_flag()), d.min(self.max_depth)),
            TimeControl::Infinite => (Clock::infinite(self.stop_flag()), self.max_depth),
            TimeControl::MoveTime(d) => (Clock::until(Instant::now() + d, self.stop_flag()), self.max_depth),
            TimeControl::GameTime(mut gt) => {
                let stm = self.board.to_move();
                gt.update_recommended_time(stm, self.board.full_move_number() as usize * 2);
                let budget = gt.recommended_time.unwrap_or(Duration::from_millis(50));
                (Clock::until(Instant::now() + budget, self.stop_flag()), self.max_depth)
            }
        };

        let mut ctx = SearchContext::new(&mut self.tt, &mut self.history, clock);
        let start = Instant::now();
        let (best, score) = iterative_deepening(&mut self.board, &mut ctx, max_depth, start, &mut on_progress);
        (best, score)
    }

    pub fn make_move(&mut self, m: Move) -> bool {
        self.board.make_move(m)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_default_table()
    }
}

/// Renders a progress report the way the command loop prints it: `info depth N seldepth N nodes
/// N nps N time N score <cp X|mate K> pv ...`.
pub fn format_info(progress: &SearchProgress, stm: Color) -> String {
    let nps = if progress.elapsed_ms > 0 { progress.nodes * 1000 / progress.elapsed_ms as u64 } else { progress.nodes };
    // Mate scores keep the side-to-move-relative sign as-is; only centipawn scores are re-signed
    // to white's perspective.
    let score = if progress.score.abs() > crate::search::MATE_THRESHOLD {
        score_string(progress.score)
    } else {
        match stm {
            Color::White => score_string(progress.score),
            Color::Black => score_string(-progress.score),
        }
    };
    let pv = progress.pv.iter().map(Move::to_lan).collect::<Vec<_>>().join(" ");
    format!(
        "info depth {} seldepth {} nodes {} nps {} time {} score {} pv {}",
        progress.depth, progress.sel_depth, progress.nodes, nps, progress.elapsed_ms, score, pv
    )
}
