use std::fmt;

use crate::board::history::History;
use crate::board::undo::Undo;
use crate::board::zobrist::ZOBRIST;
use crate::moves::moves::{Castle, Direction, Move, Promotion, CASTLING_RIGHTS};
use crate::types::bitboard::Bitboard;
use crate::types::pieces::{Color, Piece, PieceName, NUM_PIECES};
use crate::types::square::Square;

/// Bitboard chess position: one `u64` per (color, piece) pair, a redundant mailbox for O(1)
/// piece-at-square lookups, and an undo stack recording exactly the irreversible state a move may
/// have clobbered so `unmake_move` is a perfect inverse of `make_move` with no recomputation.
#[derive(Clone)]
pub struct Board {
    bitboards: [Bitboard; NUM_PIECES],
    color_occupancies: [Bitboard; 2],
    mailbox: [Piece; 64],
    stm: Color,
    castling_rights: u8,
    en_passant_square: Option<Square>,
    half_moves: u16,
    full_moves: u16,
    zobrist_hash: u64,
    pub(crate) history: History,
    undo_stack: Vec<Undo>,
}

impl Board {
    pub fn empty() -> Self {
        Self {
            bitboards: [Bitboard::EMPTY; NUM_PIECES],
            color_occupancies: [Bitboard::EMPTY; 2],
            mailbox: [Piece::None; 64],
            stm: Color::White,
            castling_rights: 0,
            en_passant_square: None,
            half_moves: 0,
            full_moves: 1,
            zobrist_hash: 0,
            history: History::default(),
            undo_stack: Vec::with_capacity(512),
        }
    }

    pub fn to_move(&self) -> Color {
        self.stm
    }

    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    pub fn half_move_clock(&self) -> u16 {
        self.half_moves
    }

    pub fn full_move_number(&self) -> u16 {
        self.full_moves
    }

    pub fn hash_key(&self) -> u64 {
        self.zobrist_hash
    }

    pub fn occupancies(&self) -> Bitboard {
        self.color_occupancies[0] | self.color_occupancies[1]
    }

    pub fn color(&self, color: Color) -> Bitboard {
        self.color_occupancies[color.idx()]
    }

    pub fn bitboard(&self, color: Color, piece: PieceName) -> Bitboard {
        self.bitboards[piece.idx()] & self.color_occupancies[color.idx()]
    }

    pub fn piece(&self, piece: PieceName) -> Bitboard {
        self.bitboards[piece.idx()]
    }

    pub fn piece_at(&self, sq: Square) -> Piece {
        self.mailbox[sq]
    }

    pub fn king_square(&self, color: Color) -> Square {
        self.bitboard(color, PieceName::King).get_lsb()
    }

    pub fn can_castle(&self, castle: Castle) -> bool {
        self.castling_rights & (castle as u8) != 0
    }

    pub fn in_check(&self) -> bool {
        self.square_attacked_by(!self.stm, self.king_square(self.stm))
    }

    /// Draw by the fifty-move rule, insufficient material, or threefold repetition.
    pub fn is_draw(&self) -> bool {
        self.half_moves >= 100 || self.is_material_draw() || self.is_repetition()
    }

    fn is_repetition(&self) -> bool {
        self.history.is_repetition(self.zobrist_hash, self.half_moves as usize)
    }

    /// KvK, KvKN, and KvKB are the only material configurations from which mate is structurally
    /// impossible; everything else is left to search/eval to resolve.
    pub fn is_material_draw(&self) -> bool {
        let non_king = self.occupancies() & !self.piece(PieceName::King);
        if non_king == Bitboard::EMPTY {
            return true;
        }
        if non_king.count_bits() != 1 {
            return false;
        }
        let minor = self.piece(PieceName::Knight) | self.piece(PieceName::Bishop);
        non_king & minor != Bitboard::EMPTY
    }

    pub(crate) fn place(&mut self, piece: Piece, sq: Square) {
        debug_assert_eq!(self.mailbox[sq], Piece::None, "placing onto an occupied square");
        self.mailbox[sq] = piece;
        self.bitboards[piece.name()] ^= sq.bitboard();
        self.color_occupancies[piece.color()] ^= sq.bitboard();
        self.zobrist_hash ^= ZOBRIST.piece_hash(piece.color(), piece.name(), sq.idx());
    }

    fn remove(&mut self, sq: Square) {
        let piece = self.mailbox[sq];
        if piece == Piece::None {
            return;
        }
        self.mailbox[sq] = Piece::None;
        self.bitboards[piece.name()] ^= sq.bitboard();
        self.color_occupancies[piece.color()] ^= sq.bitboard();
        self.zobrist_hash ^= ZOBRIST.piece_hash(piece.color(), piece.name(), sq.idx());
    }

    pub(crate) fn set_side_to_move(&mut self, color: Color) {
        if self.stm != color {
            self.zobrist_hash ^= ZOBRIST.turn_hash;
            self.stm = color;
        }
    }

    pub(crate) fn set_castling_rights(&mut self, rights: u8) {
        self.castling_rights = rights;
    }

    pub(crate) fn set_en_passant_square(&mut self, sq: Option<Square>) {
        self.en_passant_square = sq;
    }

    pub(crate) fn set_half_moves(&mut self, half_moves: u16) {
        self.half_moves = half_moves;
    }

    pub(crate) fn set_full_moves(&mut self, full_moves: u16) {
        self.full_moves = full_moves;
    }

    /// Recomputes the Zobrist key from scratch. Only used once, right after a FEN is parsed, to
    /// seed `zobrist_hash` for the incremental XOR maintenance `make_move`/`unmake_move` do from
    /// then on.
    pub(crate) fn rehash(&mut self) {
        let mut hash = 0;
        for color in Color::iter() {
            for piece in PieceName::iter() {
                for sq in self.bitboard(color, piece) {
                    hash ^= ZOBRIST.piece_hash(color, piece, sq.idx());
                }
            }
        }
        if let Some(sq) = self.en_passant_square {
            hash ^= ZOBRIST.en_passant[sq.idx()];
        }
        hash ^= ZOBRIST.castling[self.castling_rights as usize];
        if self.stm == Color::Black {
            hash ^= ZOBRIST.turn_hash;
        }
        self.zobrist_hash = hash;
        self.history.clear();
        self.history.push(self.zobrist_hash);
    }

    /// Plays `m`, returning `false` (and leaving the board exactly as it was) if the move leaves
    /// the mover's own king in check, i.e. it was pseudo-legal but not legal. `Move::NULL` plays
    /// the reversible side-to-move toggle used by null-move pruning.
    pub fn make_move(&mut self, m: Move) -> bool {
        self.undo_stack.push(Undo {
            m,
            castling_rights: self.castling_rights,
            en_passant_square: self.en_passant_square,
            half_moves: self.half_moves,
            zobrist_hash: self.zobrist_hash,
        });

        if m == Move::NULL {
            if let Some(sq) = self.en_passant_square {
                self.zobrist_hash ^= ZOBRIST.en_passant[sq.idx()];
            }
            self.en_passant_square = None;
            self.half_moves += 1;
            self.set_side_to_move(!self.stm);
            self.history.push(self.zobrist_hash);
            return true;
        }

        let mover_color = self.stm;
        let piece_moving = m.piece_moving();

        if m.is_en_passant() {
            let cap_sq = match mover_color {
                Color::White => m.dest_square().shift(Direction::South),
                Color::Black => m.dest_square().shift(Direction::North),
            };
            self.remove(cap_sq);
        } else {
            self.remove(m.dest_square());
        }
        self.remove(m.origin_square());

        match m.promotion_piece() {
            Some(promo) => self.place(Piece::new(promo.piece_name(), mover_color), m.dest_square()),
            None => self.place(Piece::new(piece_moving, mover_color), m.dest_square()),
        }

        if m.is_castle() {
            let castle = m.castle_type();
            self.remove(castle.rook_src());
            self.place(Piece::new(PieceName::Rook, mover_color), castle.rook_dest());
        }

        self.zobrist_hash ^= ZOBRIST.castling[self.castling_rights as usize];
        self.castling_rights &= CASTLING_RIGHTS[m.origin_square().idx()] & CASTLING_RIGHTS[m.dest_square().idx()];
        self.zobrist_hash ^= ZOBRIST.castling[self.castling_rights as usize];

        if let Some(sq) = self.en_passant_square {
            self.zobrist_hash ^= ZOBRIST.en_passant[sq.idx()];
        }
        self.en_passant_square = if m.is_double_push() {
            Some(m.dest_square().shift(match mover_color {
                Color::White => Direction::South,
                Color::Black => Direction::North,
            }))
        } else {
            None
        };
        if let Some(sq) = self.en_passant_square {
            self.zobrist_hash ^= ZOBRIST.en_passant[sq.idx()];
        }

        self.half_moves = if m.is_capture() || piece_moving == PieceName::Pawn { 0 } else { self.half_moves + 1 };
        if mover_color == Color::Black {
            self.full_moves += 1;
        }

        self.set_side_to_move(!mover_color);

        if self.square_attacked_by(!mover_color, self.king_square(mover_color)) {
            self.unmake_move();
            return false;
        }

        self.history.push(self.zobrist_hash);
        true
    }

    /// Reverses the most recent `make_move`. Panics (via `expect`) if called without a matching
    /// `make_move` first, which would be a bug in the caller, not a recoverable condition.
    pub fn unmake_move(&mut self) {
        let undo = self.undo_stack.pop().expect("unmake_move called without a matching make_move");
        self.history.pop();
        self.stm = !self.stm;
        let m = undo.m;

        if m != Move::NULL {
            let mover = Piece::new(m.piece_moving(), self.stm);
            self.remove(m.dest_square());
            self.place(mover, m.origin_square());

            if m.is_castle() {
                let castle = m.castle_type();
                self.remove(castle.rook_dest());
                self.place(Piece::new(PieceName::Rook, self.stm), castle.rook_src());
            } else if m.is_en_passant() {
                let cap_sq = match self.stm {
                    Color::White => m.dest_square().shift(Direction::South),
                    Color::Black => m.dest_square().shift(Direction::North),
                };
                self.place(Piece::new(PieceName::Pawn, !self.stm), cap_sq);
            } else if let Some(captured) = m.captured_piece() {
                self.place(Piece::new(captured, !self.stm), m.dest_square());
            }
        }

        self.castling_rights = undo.castling_rights;
        self.en_passant_square = undo.en_passant_square;
        self.half_moves = undo.half_moves;
        self.zobrist_hash = undo.zobrist_hash;
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in (0..8).rev() {
            for file in 0..8 {
                write!(f, "{} ", self.mailbox[Square((rank * 8 + file) as u8)].char())?;
            }
            writeln!(f)?;
        }
        write!(f, "{:?} to move", self.stm)
    }
}

#[cfg(test)]
mod board_tests {
    use super::*;
    use crate::board::fen;

    #[test]
    fn place_and_remove_round_trip_bitboards() {
        let mut board = Board::empty();
        board.place(Piece::WhiteKnight, Square(18));
        assert_eq!(board.piece_at(Square(18)), Piece::WhiteKnight);
        assert!(board.bitboard(Color::White, PieceName::Knight).occupied(Square(18)));
        board.remove(Square(18));
        assert_eq!(board.piece_at(Square(18)), Piece::None);
    }

    #[test]
    fn make_then_unmake_restores_hash_and_occupancy() {
        let mut board = fen::build_board(fen::STARTING_FEN).unwrap();
        let before_hash = board.hash_key();
        let before_occ = board.occupancies();
        let mv = board.generate_legal_moves().iter().next().unwrap();
        assert!(board.make_move(mv));
        assert_ne!(board.hash_key(), before_hash);
        board.unmake_move();
        assert_eq!(board.hash_key(), before_hash);
        assert_eq!(board.occupancies(), before_occ);
    }

    #[test]
    fn null_move_toggles_side_and_is_reversible() {
        let mut board = fen::build_board(fen::STARTING_FEN).unwrap();
        let before = board.hash_key();
        assert!(board.make_move(Move::NULL));
        assert_eq!(board.to_move(), Color::Black);
        board.unmake_move();
        assert_eq!(board.to_move(), Color::White);
        assert_eq!(board.hash_key(), before);
    }

    #[test]
    fn illegal_move_leaves_king_in_check_is_rejected() {
        let mut board = fen::build_board("4k3/8/8/8/8/8/8/4K2r w - - 0 1").unwrap();
        let illegal = Move::quiet(Square(4), Square(5), PieceName::King);
        assert!(!board.make_move(illegal));
    }

    #[test]
    fn bare_kings_is_material_draw() {
        let board = fen::build_board("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(board.is_material_draw());
    }
}
