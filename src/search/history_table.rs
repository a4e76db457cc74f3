use crate::types::pieces::{Color, PieceName};
use crate::types::square::Square;

/// Every cell is kept within `[-HISTORY_MAX, HISTORY_MAX]`; an update that would push any cell
/// past the bound instead halves the whole table first.
pub const HISTORY_MAX: i32 = 100_000_000;

const NUM_COLOR_PIECE: usize = 16;

fn index(color: Color, piece: PieceName) -> usize {
    (color.idx() << 3) | piece.idx()
}

/// Quiet-move history, indexed by `(color | piece, to_square)`. Grows a move's score whenever it
/// causes a beta cutoff and ages every *other* cell down at the same time ("global aging")
/// rather than aging the whole table only periodically.
#[derive(Clone)]
pub struct HistoryTable {
    table: Box<[[i32; 64]; NUM_COLOR_PIECE]>,
}

impl HistoryTable {
    pub fn score(&self, color: Color, piece: PieceName, to: Square) -> i32 {
        self.table[index(color, piece)][to]
    }

    /// Rewards `best` with `depth^2` and ages every other cell down by the same amount. If the
    /// update would push any cell beyond `HISTORY_MAX`, the entire table is halved first.
    pub fn update(&mut self, color: Color, piece: PieceName, to: Square, depth: i32) {
        let bonus = depth * depth;
        let best_idx = index(color, piece);

        let would_overflow = self.table.iter().flatten().any(|&cell| (cell.abs() + bonus) > HISTORY_MAX);
        if would_overflow {
            for row in self.table.iter_mut() {
                for cell in row.iter_mut() {
                    *cell /= 2;
                }
            }
        }

        for (idx, row) in self.table.iter_mut().enumerate() {
            for (sq, cell) in row.iter_mut().enumerate() {
                if idx == best_idx && sq == to.idx() {
                    *cell += bonus;
                } else {
                    *cell -= bonus;
                }
            }
        }
    }

    /// Ages the whole table down between searches rather than wiping it: a move that was good
    /// several searches ago is still weak evidence now, unlike a killer from the previous ply.
    pub fn age(&mut self) {
        for row in self.table.iter_mut() {
            for cell in row.iter_mut() {
                *cell /= 8;
            }
        }
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self { table: Box::new([[0; 64]; NUM_COLOR_PIECE]) }
    }
}
