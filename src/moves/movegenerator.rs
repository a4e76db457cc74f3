use crate::{
    board::board::Board,
    moves::{
        moves::Direction,
        moves::Direction::*,
    },
    types::{
        bitboard::Bitboard,
        pieces::{Color, PieceName},
        square::Square,
    },
};

use super::{
    attack_boards::{king_attacks, knight_attacks, RANK2, RANK3, RANK6, RANK7},
    movelist::MoveList,
    moves::{Castle, Move, MoveType, Promotion},
    sliders::{bishop_attacks, queen_attacks, rook_attacks},
};

#[allow(clippy::upper_case_acronyms)]
pub type MGT = MoveGenerationType;

#[derive(Copy, Clone, PartialEq, Eq)]
pub enum MoveGenerationType {
    CapturesOnly,
    QuietsOnly,
    All,
}

impl Board {
    /// Generates every pseudo-legal move for the side to move. Capped at 256 entries via the
    /// fixed-capacity `MoveList`, matching the documented resource ceiling per node.
    pub fn generate_moves(&self, gen_type: MGT) -> MoveList {
        let mut moves = MoveList::default();

        for piece in [PieceName::Knight, PieceName::Bishop, PieceName::Rook, PieceName::Queen, PieceName::King] {
            self.generate_piece_moves(piece, gen_type, &mut moves);
        }
        self.generate_pawn_moves(gen_type, &mut moves);
        if gen_type != MGT::CapturesOnly {
            self.generate_castling_moves(&mut moves);
        }
        moves
    }

    /// Filters pseudo-legal moves down to legal ones by actually making and unmaking each move.
    pub fn generate_legal_moves(&mut self) -> MoveList {
        let pseudo = self.generate_moves(MGT::All);
        let mut legal = MoveList::default();
        for m in pseudo.iter() {
            if self.make_move(m) {
                self.unmake_move();
                legal.push(m);
            }
        }
        legal
    }

    fn generate_castling_moves(&self, moves: &mut MoveList) {
        if self.in_check() {
            return;
        }
        match self.to_move() {
            Color::White => {
                if self.can_castle(Castle::WhiteKing)
                    && self.occupancies().empty(Square(5))
                    && self.occupancies().empty(Square(6))
                    && !self.square_attacked_by(Color::Black, Square(4))
                    && !self.square_attacked_by(Color::Black, Square(5))
                    && !self.square_attacked_by(Color::Black, Square(6))
                {
                    moves.push(Move::castle(Square(4), Square(6)));
                }
                if self.can_castle(Castle::WhiteQueen)
                    && self.occupancies().empty(Square(1))
                    && self.occupancies().empty(Square(2))
                    && self.occupancies().empty(Square(3))
                    && !self.square_attacked_by(Color::Black, Square(2))
                    && !self.square_attacked_by(Color::Black, Square(3))
                    && !self.square_attacked_by(Color::Black, Square(4))
                {
                    moves.push(Move::castle(Square(4), Square(2)));
                }
            }
            Color::Black => {
                if self.can_castle(Castle::BlackKing)
                    && self.occupancies().empty(Square(61))
                    && self.occupancies().empty(Square(62))
                    && !self.square_attacked_by(Color::White, Square(60))
                    && !self.square_attacked_by(Color::White, Square(61))
                    && !self.square_attacked_by(Color::White, Square(62))
                {
                    moves.push(Move::castle(Square(60), Square(62)));
                }
                if self.can_castle(Castle::BlackQueen)
                    && self.occupancies().empty(Square(57))
                    && self.occupancies().empty(Square(58))
                    && self.occupancies().empty(Square(59))
                    && !self.square_attacked_by(Color::White, Square(58))
                    && !self.square_attacked_by(Color::White, Square(59))
                    && !self.square_attacked_by(Color::White, Square(60))
                {
                    moves.push(Move::castle(Square(60), Square(58)));
                }
            }
        }
    }

    fn generate_pawn_moves(&self, gen_type: MGT, moves: &mut MoveList) {
        let side = self.to_move();
        let pawns = self.bitboard(side, PieceName::Pawn);
        let vacancies = !self.occupancies();
        let enemies = self.color(!side);

        let (non_promotions, promotions) = match side {
            Color::White => (pawns & !RANK7, pawns & RANK7),
            Color::Black => (pawns & !RANK2, pawns & RANK2),
        };

        let up = match side {
            Color::White => North,
            Color::Black => South,
        };
        let down = up.opp();
        let up_left = match side {
            Color::White => NorthWest,
            Color::Black => SouthEast,
        };
        let down_right = up_left.opp();
        let up_right = match side {
            Color::White => NorthEast,
            Color::Black => SouthWest,
        };
        let down_left = up_right.opp();
        let rank3_bb = match side {
            Color::White => RANK3,
            Color::Black => RANK6,
        };

        if gen_type != MGT::CapturesOnly {
            let push_one = vacancies & non_promotions.shift(up);
            let push_two = vacancies & (push_one & rank3_bb).shift(up);
            for dest in push_one {
                moves.push(Move::quiet(dest.shift(down), dest, PieceName::Pawn));
            }
            for dest in push_two {
                moves.push(Move::double_push(dest.shift(down).shift(down), dest, PieceName::Pawn));
            }
        }

        if promotions != Bitboard::EMPTY {
            // A quiet push-promotion is still tactical enough that quiescence (which asks for
            // `CapturesOnly`) must see it, so this one ignores the `CapturesOnly` filter that
            // other quiet pawn moves respect below.
            for dest in promotions.shift(up) & vacancies {
                gen_promotions(dest.shift(down), dest, None, moves);
            }
            if gen_type != MGT::QuietsOnly {
                for dest in promotions.shift(up_left) & enemies {
                    gen_promotions(dest.shift(down_right), dest, Some(self.piece_at(dest).name()), moves);
                }
                for dest in promotions.shift(up_right) & enemies {
                    gen_promotions(dest.shift(down_left), dest, Some(self.piece_at(dest).name()), moves);
                }
            }
        }

        if gen_type != MGT::QuietsOnly && non_promotions != Bitboard::EMPTY {
            for dest in non_promotions.shift(up_left) & enemies {
                let src = dest.shift(down_right);
                moves.push(Move::capture(src, dest, PieceName::Pawn, self.piece_at(dest).name()));
            }
            for dest in non_promotions.shift(up_right) & enemies {
                let src = dest.shift(down_left);
                moves.push(Move::capture(src, dest, PieceName::Pawn, self.piece_at(dest).name()));
            }

            if let Some(ep) = self.en_passant_square() {
                if let Some(src) = ep.checked_shift(down_right) {
                    if self.bitboard(side, PieceName::Pawn).occupied(src) {
                        moves.push(Move::en_passant(src, ep));
                    }
                }
                if let Some(src) = ep.checked_shift(down_left) {
                    if self.bitboard(side, PieceName::Pawn).occupied(src) {
                        moves.push(Move::en_passant(src, ep));
                    }
                }
            }
        }
    }

    fn generate_piece_moves(&self, piece_name: PieceName, gen_type: MGT, moves: &mut MoveList) {
        let side = self.to_move();
        let occ = self.occupancies();
        for sq in self.bitboard(side, piece_name) {
            let attack_bb = match piece_name {
                PieceName::King => king_attacks(sq),
                PieceName::Queen => queen_attacks(sq, occ),
                PieceName::Rook => rook_attacks(sq, occ),
                PieceName::Bishop => bishop_attacks(sq, occ),
                PieceName::Knight => knight_attacks(sq),
                _ => unreachable!(),
            };
            let targets = match gen_type {
                MGT::CapturesOnly => attack_bb & self.color(!side),
                MGT::QuietsOnly => attack_bb & !occ,
                MGT::All => attack_bb & !self.color(side),
            };
            for dest in targets {
                let captured = self.piece_at(dest);
                if captured.name() == PieceName::None {
                    moves.push(Move::quiet(sq, dest, piece_name));
                } else {
                    moves.push(Move::capture(sq, dest, piece_name, captured.name()));
                }
            }
        }
    }

    /// True if any piece of `attacker`'s color attacks `sq` on the current occupancy.
    pub fn square_attacked_by(&self, attacker: Color, sq: Square) -> bool {
        self.attackers_for_side(attacker, sq, self.occupancies()) != Bitboard::EMPTY
    }

    pub fn attackers_for_side(&self, attacker: Color, sq: Square, occupancy: Bitboard) -> Bitboard {
        use super::attack_boards::pawn_attacks;
        let diag = self.piece(PieceName::Queen) | self.piece(PieceName::Bishop);
        let ortho = self.piece(PieceName::Queen) | self.piece(PieceName::Rook);
        let pawns = pawn_attacks(sq, !attacker) & self.piece(PieceName::Pawn);
        let knights = knight_attacks(sq) & self.piece(PieceName::Knight);
        let bishops = bishop_attacks(sq, occupancy) & diag;
        let rooks = rook_attacks(sq, occupancy) & ortho;
        let king = king_attacks(sq) & self.piece(PieceName::King);
        (pawns | knights | bishops | rooks | king) & self.color(attacker)
    }
}

fn gen_promotions(src: Square, dest: Square, captured: Option<PieceName>, moves: &mut MoveList) {
    for promo in [Promotion::Queen, Promotion::Rook, Promotion::Bishop, Promotion::Knight] {
        moves.push(Move::promotion(src, dest, promo, captured));
    }
}
