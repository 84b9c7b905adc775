//! Zobrist hashing for chess positions.
//!
//! Three keys are maintained incrementally: one over pawns, one over all
//! other pieces, and the position key that folds both together with the
//! side-to-move / castling state and the en passant file.

use once_cell::sync::Lazy;
use rand::prelude::*;

use crate::board::{CastlingRights, Color, Piece, Square, SQUARE_COUNT};

pub(crate) struct ZobristKeys {
    // piece_keys[color][piece][padded square]
    piece_keys: [[[u64; SQUARE_COUNT]; 6]; 2],
    // state_keys[castling bits | side << 4]
    state_keys: [u64; 32],
    // en_passant_keys[file] (only the file matters for the target)
    en_passant_keys: [u64; 8],
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(1234567890_u64); // Use a fixed seed for reproducibility
        let mut piece_keys = [[[0; SQUARE_COUNT]; 6]; 2];
        let mut state_keys = [0; 32];
        let mut en_passant_keys = [0; 8];

        for color in &mut piece_keys {
            for piece in color.iter_mut() {
                for sq in Square::ALL {
                    piece[sq.index()] = rng.gen();
                }
            }
        }

        for key in &mut state_keys {
            *key = rng.gen();
        }

        for key in &mut en_passant_keys {
            *key = rng.gen();
        }

        ZobristKeys {
            piece_keys,
            state_keys,
            en_passant_keys,
        }
    }

    #[inline]
    pub(crate) fn piece(&self, color: Color, piece: Piece, sq: Square) -> u64 {
        self.piece_keys[color.index()][piece.index()][sq.index()]
    }

    #[inline]
    pub(crate) fn state(&self, side: Color, castling: CastlingRights) -> u64 {
        self.state_keys[castling.as_u8() as usize | side.index() << 4]
    }

    #[inline]
    pub(crate) fn en_passant(&self, target: Option<Square>) -> u64 {
        target.map_or(0, |sq| self.en_passant_keys[sq.file()])
    }
}

pub(crate) static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);

/// Pawn key and non-pawn key for a set of placed pieces.
pub(crate) fn material_keys<'a>(
    pieces: impl Iterator<Item = (Color, Piece, Square)> + 'a,
) -> (u64, u64) {
    let mut pawn_key = 0;
    let mut piece_key = 0;
    for (color, piece, sq) in pieces {
        let key = ZOBRIST.piece(color, piece, sq);
        if piece == Piece::Pawn {
            pawn_key ^= key;
        } else {
            piece_key ^= key;
        }
    }
    (pawn_key, piece_key)
}

/// Combine the two placement keys with the state terms.
#[inline]
pub(crate) fn position_key(
    pawn_key: u64,
    piece_key: u64,
    side: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
) -> u64 {
    pawn_key ^ piece_key ^ ZOBRIST.state(side, castling) ^ ZOBRIST.en_passant(en_passant)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_reproducible_and_distinct() {
        let e4: Square = "e4".parse().unwrap();
        let e5: Square = "e5".parse().unwrap();
        let a = ZOBRIST.piece(Color::White, Piece::Pawn, e4);
        assert_eq!(a, ZobristKeys::new().piece(Color::White, Piece::Pawn, e4));
        assert_ne!(a, ZOBRIST.piece(Color::White, Piece::Pawn, e5));
        assert_ne!(a, ZOBRIST.piece(Color::Black, Piece::Pawn, e4));
    }

    #[test]
    fn test_state_key_depends_on_side_and_rights() {
        let all = CastlingRights::all();
        assert_ne!(ZOBRIST.state(Color::White, all), ZOBRIST.state(Color::Black, all));
        assert_ne!(
            ZOBRIST.state(Color::White, all),
            ZOBRIST.state(Color::White, CastlingRights::none())
        );
        assert_eq!(ZOBRIST.en_passant(None), 0);
    }

    #[test]
    fn test_material_keys_split_pawns() {
        let e2: Square = "e2".parse().unwrap();
        let g1: Square = "g1".parse().unwrap();
        let (pawns, pieces) = material_keys(
            [
                (Color::White, Piece::Pawn, e2),
                (Color::White, Piece::Knight, g1),
            ]
            .into_iter(),
        );
        assert_eq!(pawns, ZOBRIST.piece(Color::White, Piece::Pawn, e2));
        assert_eq!(pieces, ZOBRIST.piece(Color::White, Piece::Knight, g1));
    }
}
