//! Castling rights type.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Color;
use super::square::{Square, SQUARE_COUNT};

const CASTLE_WHITE_K: u8 = 1 << 0;
const CASTLE_WHITE_Q: u8 = 1 << 1;
const CASTLE_BLACK_K: u8 = 1 << 2;
const CASTLE_BLACK_Q: u8 = 1 << 3;

/// All castling rights combined
const ALL_CASTLING_RIGHTS: u8 =
    CASTLE_WHITE_K | CASTLE_WHITE_Q | CASTLE_BLACK_K | CASTLE_BLACK_Q;

/// Per-square mask of the rights that survive a move touching that
/// square. Moving from or capturing on a king or rook home square strips
/// the associated rights.
pub(crate) static CASTLE_TOUCH: [u8; SQUARE_COUNT] = {
    let mut mask = [ALL_CASTLING_RIGHTS; SQUARE_COUNT];
    mask[0x00] = ALL_CASTLING_RIGHTS & !CASTLE_WHITE_Q; // a1
    mask[0x04] = ALL_CASTLING_RIGHTS & !(CASTLE_WHITE_K | CASTLE_WHITE_Q); // e1
    mask[0x07] = ALL_CASTLING_RIGHTS & !CASTLE_WHITE_K; // h1
    mask[0x70] = ALL_CASTLING_RIGHTS & !CASTLE_BLACK_Q; // a8
    mask[0x74] = ALL_CASTLING_RIGHTS & !(CASTLE_BLACK_K | CASTLE_BLACK_Q); // e8
    mask[0x77] = ALL_CASTLING_RIGHTS & !CASTLE_BLACK_K; // h8
    mask
};

/// Castling rights represented as a bitmask
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastlingRights(u8);

impl CastlingRights {
    /// No castling rights
    #[must_use]
    pub const fn none() -> Self {
        CastlingRights(0)
    }

    /// All castling rights (both sides can castle kingside and queenside)
    #[must_use]
    pub const fn all() -> Self {
        CastlingRights(ALL_CASTLING_RIGHTS)
    }

    /// Check if a specific castling right is set
    #[inline]
    #[must_use]
    pub const fn has(self, color: Color, kingside: bool) -> bool {
        let bit = Self::bit_for(color, kingside);
        self.0 & bit != 0
    }

    /// Set a specific castling right
    #[inline]
    pub fn set(&mut self, color: Color, kingside: bool) {
        self.0 |= Self::bit_for(color, kingside);
    }

    /// Remove a specific castling right
    #[inline]
    pub fn remove(&mut self, color: Color, kingside: bool) {
        self.0 &= !Self::bit_for(color, kingside);
    }

    /// Rights left after a move from `from` to `to`.
    #[inline]
    #[must_use]
    pub(crate) fn after_move(self, from: Square, to: Square) -> Self {
        CastlingRights(self.0 & CASTLE_TOUCH[from.index()] & CASTLE_TOUCH[to.index()])
    }

    /// Get the raw bitmask value (for Zobrist hashing)
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Get the bit for a specific castling right
    #[inline]
    const fn bit_for(color: Color, kingside: bool) -> u8 {
        match (color, kingside) {
            (Color::White, true) => CASTLE_WHITE_K,
            (Color::White, false) => CASTLE_WHITE_Q,
            (Color::Black, true) => CASTLE_BLACK_K,
            (Color::Black, false) => CASTLE_BLACK_Q,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_touch_mask_revokes_rights() {
        let rights = CastlingRights::all();
        let after = rights.after_move(sq("e1"), sq("e2"));
        assert!(!after.has(Color::White, true));
        assert!(!after.has(Color::White, false));
        assert!(after.has(Color::Black, true));

        let after = rights.after_move(sq("b2"), sq("h8"));
        assert!(!after.has(Color::Black, true));
        assert!(after.has(Color::Black, false));

        assert_eq!(rights.after_move(sq("d2"), sq("d4")), rights);
    }

    #[test]
    fn test_set_remove() {
        let mut rights = CastlingRights::none();
        rights.set(Color::Black, false);
        assert_eq!(rights.as_u8(), CASTLE_BLACK_Q);
        rights.remove(Color::Black, false);
        assert_eq!(rights, CastlingRights::none());
    }
}
