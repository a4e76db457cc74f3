//! The single-owner state threaded through one search call: everything `alphabeta` and `quiesce`
//! need beyond the board itself. There is exactly one of these per `Engine::search` invocation;
//! the search is strictly single-threaded, so there is never more than one of these alive.

use crate::engine::transposition::TranspositionTable;
use crate::moves::moves::Move;

use super::clock::Clock;
use super::history_table::HistoryTable;
use super::killers::KillerTable;
use super::pv::PvTable;
use super::MAX_PLY;

/// Per-ply scratch space that doesn't belong in the PV/killer/history tables: the move played to
/// reach this ply (used for the recapture bonus in move ordering) and the static evaluation
/// computed at this node (reused by null-move pruning and, later, any ply-local pruning decision
/// that wants "how good is this position before we even search a move").
#[derive(Clone, Copy, Default)]
pub struct SearchStackFrame {
    pub played_move: Move,
    pub static_eval: i32,
}

pub struct SearchContext<'a> {
    pub tt: &'a mut TranspositionTable,
    pub history: &'a mut HistoryTable,
    pub killers: KillerTable,
    pub pv: PvTable,
    pub stack: Box<[SearchStackFrame; MAX_PLY]>,
    pub clock: Clock,
    pub nodes: u64,
    pub sel_depth: usize,
    pub stopped: bool,
}

impl<'a> SearchContext<'a> {
    pub fn new(tt: &'a mut TranspositionTable, history: &'a mut HistoryTable, clock: Clock) -> Self {
        Self {
            tt,
            history,
            killers: KillerTable::default(),
            pv: PvTable::default(),
            stack: Box::new([SearchStackFrame::default(); MAX_PLY]),
            clock,
            nodes: 0,
            sel_depth: 0,
            stopped: false,
        }
    }

    /// Resets everything that must start clean for a fresh `go`, while leaving the transposition
    /// table (which persists across the whole game) and the history table (aged rather than
    /// cleared, so it keeps learning across moves) untouched.
    pub fn prepare_for_new_search(&mut self) {
        self.killers.clear();
        self.pv.clear();
        self.history.age();
        self.nodes = 0;
        self.sel_depth = 0;
        self.stopped = false;
        for frame in self.stack.iter_mut() {
            *frame = SearchStackFrame::default();
        }
    }

    /// Polls the cooperative cancellation signal every `NODES_PER_TIME_CHECK` nodes; cheap enough
    /// to call unconditionally from the hot recursion.
    pub fn should_stop(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        if self.nodes % super::NODES_PER_TIME_CHECK == 0 && self.clock.expired() {
            self.stopped = true;
        }
        self.stopped
    }
}
