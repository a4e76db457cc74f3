use lazy_static::lazy_static;

use crate::types::pieces::{Color, PieceName};

/// Deterministic splitmix64, seeded from a fixed constant rather than system entropy so that two
/// runs of the engine hash identical positions to identical keys (needed for property-based tests
/// and for bitwise-reproducible search replay under a fixed depth).
struct SplitMix64(u64);

impl SplitMix64 {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

pub struct Zobrist {
    pub piece_square_hashes: [[[u64; 64]; 6]; 2],
    pub turn_hash: u64,
    /// Indexed directly by the 4-bit castling rights bitmask (0..16), one draw per combination
    /// rather than one per individual right, so `record`/`probe` is a single XOR either way.
    pub castling: [u64; 16],
    pub en_passant: [u64; 64],
}

lazy_static! {
    pub static ref ZOBRIST: Zobrist = Zobrist::new();
}

impl Zobrist {
    fn new() -> Self {
        let mut rng = SplitMix64(0x9E3779B97F4A7C15 ^ 0xD1B5_4A32_D192_ED03);
        let turn_hash = rng.next_u64();
        let mut piece_square_hashes = [[[0u64; 64]; 6]; 2];
        for color in piece_square_hashes.iter_mut() {
            for piece in color.iter_mut() {
                for slot in piece.iter_mut() {
                    *slot = rng.next_u64();
                }
            }
        }
        let mut castling = [0u64; 16];
        for slot in castling.iter_mut() {
            *slot = rng.next_u64();
        }
        let mut en_passant = [0u64; 64];
        for slot in en_passant.iter_mut() {
            *slot = rng.next_u64();
        }
        Self { turn_hash, piece_square_hashes, castling, en_passant }
    }

    pub fn piece_hash(&self, color: Color, piece: PieceName, sq: usize) -> u64 {
        self.piece_square_hashes[color.idx()][piece.idx()][sq]
    }
}
