//! Edge case tests for special chess positions and moves.

use std::collections::BTreeSet;

use crate::board::{Move, Piece, Position, Square};

fn sq(s: &str) -> Square {
    s.parse().unwrap()
}

fn move_names(position: &mut Position) -> BTreeSet<String> {
    position
        .generate_moves()
        .iter()
        .map(|m| m.to_string())
        .collect()
}

fn find(position: &mut Position, text: &str) -> Option<Move> {
    position
        .generate_moves()
        .iter()
        .copied()
        .find(|m| m.to_string() == text)
}

#[test]
fn test_stalemate_position() {
    let mut board = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    assert!(!board.is_checkmate());
    assert!(board.is_stalemate());
    assert!(board.generate_moves().is_empty());
}

#[test]
fn test_back_rank_mate() {
    let board = Position::from_fen("3R2k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
    assert!(board.in_check());
    assert!(board.is_checkmate());
    assert!(!board.is_stalemate());
}

#[test]
fn test_underpromotions_available() {
    let mut board = Position::from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1");
    let names = move_names(&mut board);
    for promo in ["a7a8q", "a7a8r", "a7a8b", "a7a8n"] {
        assert!(names.contains(promo), "{promo} missing");
    }

    let mv = find(&mut board, "a7a8n").unwrap();
    board.apply(mv);
    assert_eq!(board.piece_at(sq("a8")).map(|p| p.1), Some(Piece::Knight));
    assert!(board.squares_of(crate::board::Color::White, Piece::Pawn).is_empty());
}

#[test]
fn test_en_passant_removes_correct_pawn() {
    let mut board =
        Position::from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 1");
    let mv = find(&mut board, "e5d6").unwrap();
    assert!(mv.is_en_passant());
    assert_eq!(mv.captured(), Some(Piece::Pawn));

    board.apply(mv);
    assert!(board.piece_at(sq("d5")).is_none(), "captured pawn should be removed");
    assert_eq!(board.piece_at(sq("d6")).map(|p| p.1), Some(Piece::Pawn));
    assert_eq!(board.en_passant(), None);

    board.reverse(mv);
    assert_eq!(board.piece_at(sq("d5")).map(|p| p.1), Some(Piece::Pawn));
    assert_eq!(board.piece_at(sq("e5")).map(|p| p.1), Some(Piece::Pawn));
    assert_eq!(board.en_passant(), Some(sq("d6")));
}

#[test]
fn test_en_passant_with_enemy_king_on_rank() {
    // the king sharing the rank is White's, so nothing is exposed
    let mut board = Position::from_fen("4k3/8/8/8/1K1Pp3/8/8/8 b - d3 0 1");
    assert!(move_names(&mut board).contains("e4d3"));
}

#[test]
fn test_en_passant_exposes_king_along_rank() {
    // both pawns leave the fourth rank, opening h4-a4
    let mut board = Position::from_fen("8/8/8/8/k2Pp2Q/8/8/4K3 b - d3 0 1");
    let names = move_names(&mut board);
    assert!(!names.contains("e4d3"));
    assert!(names.contains("e4e3"));
}

#[test]
fn test_en_passant_exposes_king_along_diagonal() {
    // the captured pawn on d5 was shielding b3 from the f7 bishop
    let mut board = Position::from_fen("7k/5b2/8/3pP3/8/1K6/8/8 w - d6 0 1");
    let names = move_names(&mut board);
    assert!(!names.contains("e5d6"));
    assert!(names.contains("e5e6"));
}

#[test]
fn test_en_passant_lands_on_pin_line() {
    // d5 shields d1 from the d8 rook, but the capturing pawn lands on d6
    // and keeps the file closed
    let mut board = Position::from_fen("3r3k/8/8/3pP3/8/8/8/3K4 w - d6 0 1");
    assert!(move_names(&mut board).contains("e5d6"));
}

#[test]
fn test_check_evasions_are_exact() {
    let mut board = Position::from_fen("4k3/8/8/8/7b/8/8/R3K2R w KQ - 0 1");
    assert!(board.in_check());
    assert_eq!(board.checkers(), 1);
    let expected: BTreeSet<String> = ["e1d1", "e1d2", "e1e2", "e1f1", "h1h4"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(move_names(&mut board), expected);
}

#[test]
fn test_double_check_allows_only_king_moves() {
    let mut board = Position::from_fen("4k3/8/8/8/8/1N3n2/8/r3K3 w - - 0 1");
    assert_eq!(board.checkers(), 2);
    let moves: Vec<Move> = board.generate_moves().iter().copied().collect();
    assert!(moves.iter().all(|m| m.piece() == Piece::King));
    let names: BTreeSet<String> = moves.iter().map(|m| m.to_string()).collect();
    let expected: BTreeSet<String> = ["e1e2", "e1f2"].iter().map(|s| s.to_string()).collect();
    assert_eq!(names, expected);
}

#[test]
fn test_king_cannot_retreat_along_check_ray() {
    let mut board = Position::from_fen("4k3/8/8/8/8/8/8/r3K3 w - - 0 1");
    let names = move_names(&mut board);
    assert!(!names.contains("e1f1"));
    assert!(!names.contains("e1d1"));
    assert!(names.contains("e1e2"));
}

#[test]
fn test_pinned_pieces() {
    // bishop pinned on a file cannot move at all
    let mut board = Position::from_fen("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1");
    assert!(board.generate_moves().iter().all(|m| m.from() != sq("e2")));

    // knight pinned on a diagonal cannot move at all
    let mut board = Position::from_fen("4k3/8/8/8/1b6/8/3N4/4K3 w - - 0 1");
    assert!(board.generate_moves().iter().all(|m| m.from() != sq("d2")));

    // queen pinned on a diagonal may slide along it and capture the pinner
    let mut board = Position::from_fen("4k3/8/8/8/1b6/8/3Q4/4K3 w - - 0 1");
    let queen: BTreeSet<String> = board
        .generate_moves()
        .iter()
        .filter(|m| m.from() == sq("d2"))
        .map(|m| m.to_string())
        .collect();
    let expected: BTreeSet<String> = ["d2c3", "d2b4"].iter().map(|s| s.to_string()).collect();
    assert_eq!(queen, expected);
}

#[test]
fn test_castling_blocked_by_attacked_transit() {
    // f1 is covered by the c4 bishop, d1 and c1 are clear
    let mut board = Position::from_fen("4k3/8/8/8/2b5/8/8/R3K2R w KQ - 0 1");
    let names = move_names(&mut board);
    assert!(!names.contains("e1g1"));
    assert!(names.contains("e1c1"));

    // an attacked b1 does not stop the long castle, an attacked c1 does
    let mut board = Position::from_fen("4k3/8/8/8/8/n7/8/R3K2R w KQ - 0 1");
    assert!(move_names(&mut board).contains("e1c1"));
    let mut board = Position::from_fen("4k3/8/8/8/8/1n6/8/R3K2R w KQ - 0 1");
    assert!(!move_names(&mut board).contains("e1c1"));
}

#[test]
fn test_no_move_leaves_own_king_attacked() {
    let fens = [
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    ];
    for fen in fens {
        let mut board = Position::from_fen(fen);
        let moves: Vec<Move> = board.generate_moves().iter().copied().collect();
        for mv in moves {
            board.apply(mv);
            assert!(!board.opponent_in_check(), "{mv} in {fen}");
            let replies: Vec<Move> = board.generate_moves().iter().copied().collect();
            for reply in replies {
                board.apply(reply);
                assert!(!board.opponent_in_check(), "{mv} {reply} in {fen}");
                board.reverse(reply);
            }
            board.reverse(mv);
        }
    }
}
