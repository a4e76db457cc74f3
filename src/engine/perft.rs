//! `go perft N` support: count leaf nodes reachable from the current position at depth `N`,
//! used to validate move generation against known-correct node counts. Single-threaded, matching
//! the rest of the search core.

use crate::board::board::Board;
use crate::moves::movegenerator::MGT;

/// Depth-first leaf count. At `depth == 1`, the size of the legal move list at the current node
/// already equals the node count one ply down (every legal move is exactly one leaf), so the
/// recursion bottoms out a ply early — the standard "bulk counting" perft optimization.
pub fn count_moves(board: &mut Board, depth: i32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = board.generate_moves(MGT::All);
    if depth == 1 {
        return moves.iter().filter(|&m| board.make_move(m) && { board.unmake_move(); true }).count() as u64;
    }
    let mut nodes = 0;
    for m in moves.iter() {
        if !board.make_move(m) {
            continue;
        }
        nodes += count_moves(board, depth - 1);
        board.unmake_move();
    }
    nodes
}

/// Per-root-move breakdown, printed by the `go perft` UCI command so a divergence against a
/// reference engine can be narrowed down to a single first move.
pub fn divided_perft(board: &mut Board, depth: i32) -> u64 {
    let mut total = 0;
    for m in board.generate_legal_moves().iter() {
        board.make_move(m);
        let count = count_moves(board, depth - 1);
        board.unmake_move();
        println!("{}: {count}", m.to_lan());
        total += count;
    }
    println!("\nNodes searched: {total}");
    total
}

#[cfg(test)]
mod perft_tests {
    use super::*;
    use crate::board::fen;

    #[test]
    fn starting_position_depth_1_has_20_moves() {
        let mut board = fen::build_board(fen::STARTING_FEN).unwrap();
        assert_eq!(count_moves(&mut board, 1), 20);
    }

    #[test]
    fn starting_position_depth_3_matches_known_count() {
        let mut board = fen::build_board(fen::STARTING_FEN).unwrap();
        assert_eq!(count_moves(&mut board, 3), 8_902);
    }

    #[test]
    fn kiwipete_depth_2_matches_known_count() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let mut board = fen::build_board(fen).unwrap();
        assert_eq!(count_moves(&mut board, 2), 2_039);
    }

    #[test]
    fn en_passant_position_depth_1_has_the_capture_available() {
        let fen = "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3";
        let mut board = fen::build_board(fen).unwrap();
        let moves = board.generate_moves(MGT::All);
        assert!(moves.iter().any(|m| m.is_en_passant()));
        assert_eq!(count_moves(&mut board, 1), moves.len() as u64);
    }
}
