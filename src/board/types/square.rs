//! Square types and utilities.
//!
//! Squares index a padded 16-file by 8-rank grid: the low nibble is the
//! file (0-7 on board, 8-15 off board) and the high nibble is the rank.
//! A square is on the board exactly when `index & 0x88 == 0`, so a single
//! step in any direction is plain integer addition followed by one mask
//! test.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::error::SquareError;

/// Number of slots in the padded grid.
pub const SQUARE_COUNT: usize = 128;

const OFF_BOARD: u8 = 0x88;

/// A square on the padded 16x8 grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Square(u8);

impl Square {
    /// The 64 on-board squares, a1 first, h8 last.
    pub const ALL: [Square; 64] = {
        let mut all = [Square(0); 64];
        let mut i = 0;
        while i < 64 {
            all[i] = Square((((i / 8) << 4) | (i % 8)) as u8);
            i += 1;
        }
        all
    };

    /// Create a square with bounds checking
    #[must_use]
    pub const fn new(rank: usize, file: usize) -> Option<Self> {
        if rank < 8 && file < 8 {
            Some(Square(((rank << 4) | file) as u8))
        } else {
            None
        }
    }

    /// Build a square from a raw padded index, rejecting off-board values.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < SQUARE_COUNT && (index as u8) & OFF_BOARD == 0 {
            Some(Square(index as u8))
        } else {
            None
        }
    }

    /// Unchecked constructor for table-driven code that already knows the
    /// index is on the board.
    #[inline]
    pub(crate) const fn from_raw(index: u8) -> Self {
        Square(index)
    }

    /// Get the rank (0-7, where 0 = rank 1)
    #[inline]
    #[must_use]
    pub const fn rank(self) -> usize {
        (self.0 >> 4) as usize
    }

    /// Get the file (0-7, where 0 = file a)
    #[inline]
    #[must_use]
    pub const fn file(self) -> usize {
        (self.0 & 0x0F) as usize
    }

    /// Padded index (0-127), usable for any table sized `SQUARE_COUNT`.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Dense index (0-63, a1=0, b1=1, ..., h8=63)
    #[inline]
    #[must_use]
    pub const fn dense_index(self) -> usize {
        self.rank() * 8 + self.file()
    }

    /// Step by a padded-grid delta. `None` when the step leaves the board.
    #[inline]
    #[must_use]
    pub const fn offset(self, delta: i8) -> Option<Square> {
        let target = self.0.wrapping_add(delta as u8);
        if target & OFF_BOARD == 0 {
            Some(Square(target))
        } else {
            None
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (self.file() as u8 + b'a') as char, self.rank() + 1)
    }
}

impl TryFrom<(usize, usize)> for Square {
    type Error = SquareError;

    fn try_from((rank, file): (usize, usize)) -> Result<Self, Self::Error> {
        if rank >= 8 {
            return Err(SquareError::RankOutOfBounds { rank });
        }
        if file >= 8 {
            return Err(SquareError::FileOutOfBounds { file });
        }
        Ok(Square(((rank << 4) | file) as u8))
    }
}

impl FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let invalid = || SquareError::InvalidNotation {
            notation: s.to_string(),
        };
        if bytes.len() != 2 {
            return Err(invalid());
        }

        let file = match bytes[0] {
            b'a'..=b'h' => (bytes[0] - b'a') as usize,
            _ => return Err(invalid()),
        };
        let rank = match bytes[1] {
            b'1'..=b'8' => (bytes[1] - b'1') as usize,
            _ => return Err(invalid()),
        };

        Square::try_from((rank, file))
    }
}
