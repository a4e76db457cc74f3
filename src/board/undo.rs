use crate::moves::moves::Move;
use crate::types::square::Square;

/// Everything `unmake_move` needs to restore that can't be recovered just by looking at `m`:
/// irreversible state a move may have clobbered. The captured piece itself is not duplicated here
/// since `Move` already carries it (`captured_piece()`); the prior Zobrist key is cached directly
/// rather than reconstructed by reverse-XORing, since that's simpler and just as correct.
#[derive(Clone, Copy, PartialEq)]
pub(super) struct Undo {
    pub m: Move,
    pub castling_rights: u8,
    pub en_passant_square: Option<Square>,
    pub half_moves: u16,
    pub zobrist_hash: u64,
}
