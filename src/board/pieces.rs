//! Piece store and board lookup.
//!
//! All piece records live in one fixed array split into contiguous
//! ranges, one per (color, kind), each sized to the most pieces of that
//! kind a side can own. The board maps every square to a slot index or
//! to `EMPTY`. Removal moves the last live record of the range into the
//! freed slot and repoints that record's board cell, so ranges stay dense
//! and enumeration is a plain scan of `range[..count]`.

use super::types::{Color, Piece, Square, SQUARE_COUNT};

/// Board cell value for an empty square.
pub(crate) const EMPTY: u8 = u8::MAX;

const PER_COLOR: usize = 48;
const SLOT_COUNT: usize = PER_COLOR * 2;

/// Offset of each kind's range inside one color's block.
const RANGE_OFFSET: [usize; 6] = {
    let mut offsets = [0; 6];
    let mut i = 1;
    while i < 6 {
        offsets[i] = offsets[i - 1] + Piece::ALL[i - 1].max_count();
        i += 1;
    }
    offsets
};

#[inline]
const fn range_start(color: Color, piece: Piece) -> usize {
    color.index() * PER_COLOR + RANGE_OFFSET[piece.index()]
}

/// One live piece: its fixed type plus current square.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PieceRecord {
    pub(crate) color: Color,
    pub(crate) piece: Piece,
    pub(crate) square: Square,
}

#[derive(Clone, Debug)]
pub(crate) struct PieceStore {
    slots: [PieceRecord; SLOT_COUNT],
    counts: [[u8; 6]; 2],
    board: [u8; SQUARE_COUNT],
}

impl PieceStore {
    pub(crate) fn new() -> Self {
        let mut slots = [PieceRecord {
            color: Color::White,
            piece: Piece::Pawn,
            square: Square::ALL[0],
        }; SLOT_COUNT];
        for color in Color::BOTH {
            for piece in Piece::ALL {
                let start = range_start(color, piece);
                for slot in &mut slots[start..start + piece.max_count()] {
                    slot.color = color;
                    slot.piece = piece;
                }
            }
        }
        PieceStore {
            slots,
            counts: [[0; 6]; 2],
            board: [EMPTY; SQUARE_COUNT],
        }
    }

    #[inline]
    pub(crate) fn count(&self, color: Color, piece: Piece) -> usize {
        self.counts[color.index()][piece.index()] as usize
    }

    /// Live records of one (color, kind) range.
    #[inline]
    pub(crate) fn range(&self, color: Color, piece: Piece) -> &[PieceRecord] {
        let start = range_start(color, piece);
        &self.slots[start..start + self.count(color, piece)]
    }

    #[inline]
    pub(crate) fn at(&self, sq: Square) -> Option<&PieceRecord> {
        match self.board[sq.index()] {
            EMPTY => None,
            slot => Some(&self.slots[slot as usize]),
        }
    }

    #[inline]
    pub(crate) fn is_empty(&self, sq: Square) -> bool {
        self.board[sq.index()] == EMPTY
    }

    #[inline]
    pub(crate) fn color_at(&self, sq: Square) -> Option<Color> {
        self.at(sq).map(|r| r.color)
    }

    #[inline]
    pub(crate) fn is_piece(&self, sq: Square, color: Color, piece: Piece) -> bool {
        self.at(sq)
            .is_some_and(|r| r.color == color && r.piece == piece)
    }

    #[inline]
    pub(crate) fn king(&self, color: Color) -> Square {
        debug_assert_eq!(self.count(color, Piece::King), 1, "{color} king missing");
        self.slots[range_start(color, Piece::King)].square
    }

    /// Claim the next free slot of the range. A full range or a second
    /// king is a caller bug.
    pub(crate) fn add(&mut self, color: Color, piece: Piece, sq: Square) {
        let count = self.count(color, piece);
        debug_assert!(count < piece.max_count(), "{color} {piece:?} range full");
        debug_assert!(self.is_empty(sq), "add onto occupied {sq}");
        let slot = range_start(color, piece) + count;
        self.slots[slot].square = sq;
        self.board[sq.index()] = slot as u8;
        self.counts[color.index()][piece.index()] += 1;
    }

    /// Swap-and-shrink removal.
    pub(crate) fn remove(&mut self, sq: Square) {
        let slot = self.board[sq.index()];
        debug_assert_ne!(slot, EMPTY, "remove from empty {sq}");
        let slot = slot as usize;
        let PieceRecord { color, piece, .. } = self.slots[slot];
        let last = range_start(color, piece) + self.count(color, piece) - 1;
        if slot != last {
            let moved = self.slots[last].square;
            self.slots[slot].square = moved;
            self.board[moved.index()] = slot as u8;
        }
        self.board[sq.index()] = EMPTY;
        self.counts[color.index()][piece.index()] -= 1;
    }

    pub(crate) fn relocate(&mut self, from: Square, to: Square) {
        let slot = self.board[from.index()];
        debug_assert_ne!(slot, EMPTY, "relocate from empty {from}");
        debug_assert!(self.is_empty(to), "relocate onto occupied {to}");
        self.slots[slot as usize].square = to;
        self.board[to.index()] = slot;
        self.board[from.index()] = EMPTY;
    }

    /// Every live record, in range order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &PieceRecord> + '_ {
        Color::BOTH
            .into_iter()
            .flat_map(move |c| Piece::ALL.into_iter().flat_map(move |p| self.range(c, p)))
    }

    /// Cross-check board cells against records. Returns the first defect.
    pub(crate) fn check(&self) -> Result<(), String> {
        let mut seen = 0usize;
        for record in self.iter() {
            let cell = self.board[record.square.index()];
            match self.at(record.square) {
                Some(r) if r == record => {}
                _ => {
                    return Err(format!(
                        "board cell {} ({cell}) does not point at {:?}",
                        record.square, record
                    ))
                }
            }
            seen += 1;
        }
        let occupied = Square::ALL.iter().filter(|&&s| !self.is_empty(s)).count();
        if occupied != seen {
            return Err(format!("{occupied} occupied cells but {seen} live records"));
        }
        Ok(())
    }
}
