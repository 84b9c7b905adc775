//! Apply and reverse.
//!
//! `apply` reads node `ply` and writes node `ply + 1`; `reverse` pops
//! back to node `ply - 1`, whose keys and state were never touched, and
//! undoes the board, piece store, attack map and material using only
//! the fields encoded in the move.

use super::types::{Color, Move, MoveKind, Piece, Square};
use super::Position;
use crate::zobrist::ZOBRIST;

/// Rook origin and destination for a castling move.
fn castle_rook_squares(kind: MoveKind, color: Color) -> (Square, Square) {
    let rank = color.back_rank() << 4;
    let (from, to) = match kind {
        MoveKind::CastleShort => (7, 5),
        _ => (0, 3),
    };
    (
        Square::from_raw((rank | from) as u8),
        Square::from_raw((rank | to) as u8),
    )
}

/// Pawn and non-pawn key pair being updated for one move.
struct KeyDelta {
    pawn: u64,
    piece: u64,
}

impl KeyDelta {
    #[inline]
    fn toggle(&mut self, color: Color, piece: Piece, sq: Square) {
        let key = ZOBRIST.piece(color, piece, sq);
        if piece == Piece::Pawn {
            self.pawn ^= key;
        } else {
            self.piece ^= key;
        }
    }
}

impl Position {
    #[inline]
    fn is_slider_at(&self, sq: Square) -> bool {
        self.store.at(sq).is_some_and(|r| r.piece.is_slider())
    }

    /// Quiet relocation of one piece.
    fn shift(&mut self, from: Square, to: Square) {
        let slider = self.is_slider_at(from);
        if slider {
            self.attacks.clear_from(&self.store, from);
        }
        self.store.relocate(from, to);
        self.attacks.truncate(&self.store, to, Some(from));
        self.attacks.extend(&self.store, from);
        if slider {
            self.attacks.add_from(&self.store, to);
        }
    }

    /// Relocation onto an occupied enemy square.
    fn shift_capturing(&mut self, from: Square, to: Square) {
        let slider = self.is_slider_at(from);
        if slider {
            self.attacks.clear_from(&self.store, from);
        }
        if self.is_slider_at(to) {
            self.attacks.clear_from(&self.store, to);
        }
        self.store.remove(to);
        self.store.relocate(from, to);
        self.attacks.extend(&self.store, from);
        if slider {
            self.attacks.add_from(&self.store, to);
        }
    }

    /// Play `mv` for the side to move. `mv` must come from this ply's
    /// generated list.
    pub fn apply(&mut self, mv: Move) {
        debug_assert!(self.ply + 1 < self.nodes.len(), "node stack exhausted");
        let parent = &self.nodes[self.ply];
        let us = parent.side_to_move;
        let them = us.opponent();
        let castling = parent.castling.after_move(mv.from(), mv.to());
        let halfmove_clock = if mv.is_irreversible() {
            0
        } else {
            parent.halfmove_clock + 1
        };
        let fullmove_number = parent.fullmove_number + u32::from(us == Color::Black);
        let mut keys = KeyDelta {
            pawn: parent.pawn_key,
            piece: parent.piece_key,
        };

        let (from, to) = (mv.from(), mv.to());
        debug_assert!(
            self.store.is_piece(from, us, mv.piece()),
            "{mv:?} does not match the board"
        );

        match mv.kind() {
            MoveKind::CastleShort | MoveKind::CastleLong => {
                let (rook_from, rook_to) = castle_rook_squares(mv.kind(), us);
                self.attacks.clear_from(&self.store, rook_from);
                self.store.relocate(from, to);
                self.attacks.truncate(&self.store, to, Some(from));
                self.attacks.extend(&self.store, from);
                self.store.relocate(rook_from, rook_to);
                self.attacks.truncate(&self.store, rook_to, Some(rook_from));
                self.attacks.extend(&self.store, rook_from);
                self.attacks.add_from(&self.store, rook_to);
                keys.toggle(us, Piece::King, from);
                keys.toggle(us, Piece::King, to);
                keys.toggle(us, Piece::Rook, rook_from);
                keys.toggle(us, Piece::Rook, rook_to);
            }
            MoveKind::EnPassant => {
                let cap = Square::from_raw((to.index() as i32 - us.pawn_step() as i32) as u8);
                self.store.remove(cap);
                self.attacks.extend(&self.store, cap);
                self.shift(from, to);
                keys.toggle(them, Piece::Pawn, cap);
                keys.toggle(us, Piece::Pawn, from);
                keys.toggle(us, Piece::Pawn, to);
                self.material[them.index()] -= Piece::Pawn.value();
            }
            _ => {
                if let Some(captured) = mv.captured() {
                    keys.toggle(them, captured, to);
                    self.material[them.index()] -= captured.value();
                }
                if let Some(promo) = mv.promotion() {
                    if mv.is_capture() {
                        if self.is_slider_at(to) {
                            self.attacks.clear_from(&self.store, to);
                        }
                        self.store.remove(to);
                    }
                    self.store.remove(from);
                    self.store.add(us, promo, to);
                    if !mv.is_capture() {
                        self.attacks.truncate(&self.store, to, Some(from));
                    }
                    self.attacks.extend(&self.store, from);
                    if promo.is_slider() {
                        self.attacks.add_from(&self.store, to);
                    }
                    keys.toggle(us, Piece::Pawn, from);
                    keys.toggle(us, promo, to);
                    self.material[us.index()] += promo.value() - Piece::Pawn.value();
                } else {
                    if mv.is_capture() {
                        self.shift_capturing(from, to);
                    } else {
                        self.shift(from, to);
                    }
                    keys.toggle(us, mv.piece(), from);
                    keys.toggle(us, mv.piece(), to);
                }
            }
        }

        let en_passant = if mv.kind() == MoveKind::PawnDoublePush {
            from.offset(us.pawn_step())
        } else {
            None
        };

        self.ply += 1;
        let child = &mut self.nodes[self.ply];
        child.side_to_move = them;
        child.castling = castling;
        child.en_passant = en_passant;
        child.halfmove_clock = halfmove_clock;
        child.fullmove_number = fullmove_number;
        child.pawn_key = keys.pawn;
        child.piece_key = keys.piece;
        child.refresh_key();
        child.moves.clear();
        child.cursor = 0;
    }

    /// Take back `mv`, which must be the move most recently applied.
    pub fn reverse(&mut self, mv: Move) {
        debug_assert!(self.ply > 0, "reverse at root");
        self.ply -= 1;
        let us = self.nodes[self.ply].side_to_move;
        let them = us.opponent();
        let (from, to) = (mv.from(), mv.to());

        match mv.kind() {
            MoveKind::CastleShort | MoveKind::CastleLong => {
                let (rook_from, rook_to) = castle_rook_squares(mv.kind(), us);
                self.attacks.clear_from(&self.store, rook_to);
                self.store.relocate(rook_to, rook_from);
                self.attacks.truncate(&self.store, rook_from, Some(rook_to));
                self.attacks.extend(&self.store, rook_to);
                self.store.relocate(to, from);
                self.attacks.truncate(&self.store, from, Some(to));
                self.attacks.extend(&self.store, to);
                self.attacks.add_from(&self.store, rook_from);
            }
            MoveKind::EnPassant => {
                let cap = Square::from_raw((to.index() as i32 - us.pawn_step() as i32) as u8);
                self.store.relocate(to, from);
                self.attacks.truncate(&self.store, from, Some(to));
                self.attacks.extend(&self.store, to);
                self.store.add(them, Piece::Pawn, cap);
                self.attacks.truncate(&self.store, cap, None);
                self.material[them.index()] += Piece::Pawn.value();
            }
            _ => {
                if let Some(promo) = mv.promotion() {
                    if promo.is_slider() {
                        self.attacks.clear_from(&self.store, to);
                    }
                    self.store.remove(to);
                    self.store.add(us, Piece::Pawn, from);
                    if let Some(captured) = mv.captured() {
                        self.store.add(them, captured, to);
                    }
                    self.attacks.truncate(&self.store, from, Some(to));
                    if !mv.is_capture() {
                        self.attacks.extend(&self.store, to);
                    }
                    if mv.captured().is_some_and(Piece::is_slider) {
                        self.attacks.add_from(&self.store, to);
                    }
                    self.material[us.index()] -= promo.value() - Piece::Pawn.value();
                } else {
                    let slider = mv.piece().is_slider();
                    if slider {
                        self.attacks.clear_from(&self.store, to);
                    }
                    self.store.relocate(to, from);
                    match mv.captured() {
                        Some(captured) => {
                            self.store.add(them, captured, to);
                            self.attacks.truncate(&self.store, from, Some(to));
                            if captured.is_slider() {
                                self.attacks.add_from(&self.store, to);
                            }
                        }
                        None => {
                            self.attacks.truncate(&self.store, from, Some(to));
                            self.attacks.extend(&self.store, to);
                        }
                    }
                    if slider {
                        self.attacks.add_from(&self.store, from);
                    }
                }
                if let Some(captured) = mv.captured() {
                    self.material[them.index()] += captured.value();
                }
            }
        }
    }

    /// Apply `mv` and make the resulting position the new root, so a game
    /// of any length never exhausts the node stack.
    pub(crate) fn commit(&mut self, mv: Move) {
        self.apply(mv);
        self.nodes.swap(0, self.ply);
        self.ply = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play_and_take_back(fen: &str, text: &str) {
        let mut position = Position::from_fen(fen);
        let before = position.snapshot();
        let mv = position.parse_move(text).unwrap();
        position.apply(mv);
        position.audit().unwrap();
        position.reverse(mv);
        position.audit().unwrap();
        assert_eq!(position.snapshot(), before, "{text} in {fen}");
    }

    #[test]
    fn test_quiet_move_round_trip() {
        play_and_take_back(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "g1f3",
        );
    }

    #[test]
    fn test_capture_round_trip() {
        play_and_take_back("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1", "d2d5");
    }

    #[test]
    fn test_promotion_round_trip() {
        play_and_take_back("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1", "a7b8q");
        play_and_take_back("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1", "a7a8n");
    }

    #[test]
    fn test_en_passant_round_trip() {
        play_and_take_back("4k3/8/8/r2pP3/8/8/8/4K3 w - d6 0 1", "e5d6");
    }

    #[test]
    fn test_castling_round_trip() {
        play_and_take_back("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "e1g1");
        play_and_take_back("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1", "e8c8");
    }

    #[test]
    fn test_apply_updates_state() {
        let mut position = Position::new();
        let mv = position.parse_move("e2e4").unwrap();
        position.apply(mv);
        assert_eq!(position.ply(), 1);
        assert_eq!(position.side_to_move(), Color::Black);
        assert_eq!(position.en_passant(), Some("e3".parse().unwrap()));
        assert_eq!(position.halfmove_clock(), 0);
        assert_eq!(position.fullmove_number(), 1);

        let mv = position.parse_move("g8f6").unwrap();
        position.apply(mv);
        assert_eq!(position.en_passant(), None);
        assert_eq!(position.halfmove_clock(), 1);
        assert_eq!(position.fullmove_number(), 2);
    }

    #[test]
    fn test_rook_move_drops_castling_right() {
        let mut position = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let mv = position.parse_move("h1h8").unwrap();
        position.apply(mv);
        let rights = position.castling_rights();
        assert!(!rights.has(Color::White, true));
        assert!(rights.has(Color::White, false));
        assert!(!rights.has(Color::Black, true));
        assert!(rights.has(Color::Black, false));
        assert_eq!(position.material(Color::Black), 500);
    }

    #[test]
    fn test_commit_rebases_root() {
        let mut position = Position::new();
        for text in ["e2e4", "e7e5", "g1f3"] {
            let mv = position.parse_move(text).unwrap();
            position.commit(mv);
            assert_eq!(position.ply(), 0);
        }
        assert_eq!(
            position.to_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
        );
    }
}
