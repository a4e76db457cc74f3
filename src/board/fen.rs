use thiserror::Error;

use crate::board::board::Board;
use crate::moves::moves::Castle;
use crate::types::pieces::{Color, Piece, PieceName};
use crate::types::square::Square;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// FEN arrives from outside the process (a GUI or a test fixture), so malformed input is a typed
/// error here rather than a panic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("FEN is missing field {0} (expected 6 space-separated fields)")]
    MissingField(&'static str),
    #[error("board field has {0} ranks, expected 8")]
    WrongRankCount(usize),
    #[error("unrecognized piece character '{0}'")]
    UnknownPiece(char),
    #[error("invalid side to move '{0}', expected 'w' or 'b'")]
    InvalidSideToMove(String),
    #[error("invalid castling rights '{0}'")]
    InvalidCastlingRights(String),
    #[error("invalid en passant square '{0}'")]
    InvalidEnPassantSquare(String),
    #[error("invalid halfmove clock '{0}'")]
    InvalidHalfMoveClock(String),
    #[error("invalid fullmove number '{0}'")]
    InvalidFullMoveNumber(String),
}

pub fn build_board(fen: &str) -> Result<Board, FenError> {
    let mut fields = fen.split_whitespace();
    let placement = fields.next().ok_or(FenError::MissingField("piece placement"))?;
    let side = fields.next().ok_or(FenError::MissingField("side to move"))?;
    let castling = fields.next().ok_or(FenError::MissingField("castling rights"))?;
    let en_passant = fields.next().ok_or(FenError::MissingField("en passant target"))?;
    let half_moves = fields.next().unwrap_or("0");
    let full_moves = fields.next().unwrap_or("1");

    let mut board = Board::empty();

    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::WrongRankCount(ranks.len()));
    }
    for (rank_from_top, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - rank_from_top;
        let mut file = 0usize;
        for c in rank_str.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip as usize;
                continue;
            }
            if file >= 8 {
                return Err(FenError::UnknownPiece(c));
            }
            let piece = piece_from_char(c).ok_or(FenError::UnknownPiece(c))?;
            board.place(piece, Square((rank * 8 + file) as u8));
            file += 1;
        }
    }

    board.set_side_to_move(match side {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(FenError::InvalidSideToMove(other.to_string())),
    });

    board.set_castling_rights(parse_castling(castling)?);
    board.set_en_passant_square(find_en_passant_square(en_passant)?);
    board.set_half_moves(half_moves.parse().map_err(|_| FenError::InvalidHalfMoveClock(half_moves.to_string()))?);
    board.set_full_moves(full_moves.parse().map_err(|_| FenError::InvalidFullMoveNumber(full_moves.to_string()))?);

    board.rehash();
    Ok(board)
}

fn piece_from_char(c: char) -> Option<Piece> {
    let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
    let name = match c.to_ascii_lowercase() {
        'p' => PieceName::Pawn,
        'n' => PieceName::Knight,
        'b' => PieceName::Bishop,
        'r' => PieceName::Rook,
        'q' => PieceName::Queen,
        'k' => PieceName::King,
        _ => return None,
    };
    Some(Piece::new(name, color))
}

fn parse_castling(field: &str) -> Result<u8, FenError> {
    if field == "-" {
        return Ok(0);
    }
    let mut rights = 0u8;
    for c in field.chars() {
        rights |= match c {
            'K' => Castle::WhiteKing as u8,
            'Q' => Castle::WhiteQueen as u8,
            'k' => Castle::BlackKing as u8,
            'q' => Castle::BlackQueen as u8,
            _ => return Err(FenError::InvalidCastlingRights(field.to_string())),
        };
    }
    Ok(rights)
}

fn find_en_passant_square(field: &str) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    let mut chars = field.chars();
    let file = chars.next().and_then(|c| match c {
        'a'..='h' => Some(c as u8 - b'a'),
        _ => None,
    });
    let rank = chars.next().and_then(|c| c.to_digit(10));
    match (file, rank, chars.next()) {
        (Some(file), Some(rank), None) if (1..=8).contains(&rank) => Ok(Some(Square((rank as u8 - 1) * 8 + file))),
        _ => Err(FenError::InvalidEnPassantSquare(field.to_string())),
    }
}
