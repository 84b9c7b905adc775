//! Move types and move list.

use std::fmt;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Piece;
use super::square::Square;

/// What kind of move this is. Non-pawn moves are tagged by the moving
/// piece so make/unmake never has to consult the board to learn it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MoveKind {
    PawnPush,
    PawnDoublePush,
    PawnCapture,
    EnPassant,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
    CastleShort,
    CastleLong,
}

impl MoveKind {
    const ALL: [MoveKind; 11] = [
        MoveKind::PawnPush,
        MoveKind::PawnDoublePush,
        MoveKind::PawnCapture,
        MoveKind::EnPassant,
        MoveKind::Knight,
        MoveKind::Bishop,
        MoveKind::Rook,
        MoveKind::Queen,
        MoveKind::King,
        MoveKind::CastleShort,
        MoveKind::CastleLong,
    ];

    /// The piece that leaves the origin square.
    #[inline]
    #[must_use]
    pub const fn piece(self) -> Piece {
        match self {
            MoveKind::PawnPush
            | MoveKind::PawnDoublePush
            | MoveKind::PawnCapture
            | MoveKind::EnPassant => Piece::Pawn,
            MoveKind::Knight => Piece::Knight,
            MoveKind::Bishop => Piece::Bishop,
            MoveKind::Rook => Piece::Rook,
            MoveKind::Queen => Piece::Queen,
            MoveKind::King | MoveKind::CastleShort | MoveKind::CastleLong => Piece::King,
        }
    }

    #[inline]
    #[must_use]
    pub(crate) const fn for_piece(piece: Piece) -> MoveKind {
        match piece {
            Piece::Pawn => MoveKind::PawnPush,
            Piece::Knight => MoveKind::Knight,
            Piece::Bishop => MoveKind::Bishop,
            Piece::Rook => MoveKind::Rook,
            Piece::Queen => MoveKind::Queen,
            Piece::King => MoveKind::King,
        }
    }

    #[inline]
    const fn code(self) -> u32 {
        self as u32
    }
}

fn piece_code(piece: Option<Piece>) -> u32 {
    piece.map_or(0, |p| p.index() as u32 + 1)
}

fn piece_from_code(code: u32) -> Option<Option<Piece>> {
    match code {
        0 => Some(None),
        1..=6 => Some(Some(Piece::ALL[code as usize - 1])),
        _ => None,
    }
}

/// A move: immutable (kind, from, to, captured, promotion) plus a
/// search score that ordering code may rewrite freely. Equality and
/// hashing ignore the score.
#[derive(Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move {
    kind: MoveKind,
    from: Square,
    to: Square,
    captured: Option<Piece>,
    promotion: Option<Piece>,
    score: i32,
}

impl Move {
    #[inline]
    #[must_use]
    pub(crate) const fn new(
        kind: MoveKind,
        from: Square,
        to: Square,
        captured: Option<Piece>,
        promotion: Option<Piece>,
    ) -> Self {
        Move {
            kind,
            from,
            to,
            captured,
            promotion,
            score: 0,
        }
    }

    #[inline]
    #[must_use]
    pub const fn kind(self) -> MoveKind {
        self.kind
    }

    /// Get the source square
    #[inline]
    #[must_use]
    pub const fn from(self) -> Square {
        self.from
    }

    /// Get the destination square
    #[inline]
    #[must_use]
    pub const fn to(self) -> Square {
        self.to
    }

    /// Kind of the captured piece (a pawn for en passant)
    #[inline]
    #[must_use]
    pub const fn captured(self) -> Option<Piece> {
        self.captured
    }

    /// Get the promotion piece, if this is a promotion move
    #[inline]
    #[must_use]
    pub const fn promotion(self) -> Option<Piece> {
        self.promotion
    }

    #[inline]
    #[must_use]
    pub const fn piece(self) -> Piece {
        self.kind.piece()
    }

    /// Returns true if this move captures a piece (including en passant)
    #[inline]
    #[must_use]
    pub const fn is_capture(self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    #[must_use]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.kind, MoveKind::EnPassant)
    }

    /// Returns true if this move is castling (kingside or queenside)
    #[inline]
    #[must_use]
    pub const fn is_castling(self) -> bool {
        matches!(self.kind, MoveKind::CastleShort | MoveKind::CastleLong)
    }

    #[inline]
    #[must_use]
    pub const fn is_promotion(self) -> bool {
        self.promotion.is_some()
    }

    /// Pawn moves and captures reset the reversible-move counter.
    #[inline]
    #[must_use]
    pub const fn is_irreversible(self) -> bool {
        self.captured.is_some() || matches!(self.kind.piece(), Piece::Pawn)
    }

    #[inline]
    #[must_use]
    pub const fn score(self) -> i32 {
        self.score
    }

    #[inline]
    pub fn set_score(&mut self, score: i32) {
        self.score = score;
    }

    /// Pack the immutable fields into 24 bits:
    /// - bits 0-3:   kind
    /// - bits 4-10:  from (padded index)
    /// - bits 11-17: to (padded index)
    /// - bits 18-20: captured (0 = none, else piece index + 1)
    /// - bits 21-23: promotion (same encoding)
    ///
    /// Zero never encodes a real move, so it serves as "no move".
    #[inline]
    #[must_use]
    pub fn bits(self) -> u32 {
        self.kind.code()
            | (self.from.index() as u32) << 4
            | (self.to.index() as u32) << 11
            | piece_code(self.captured) << 18
            | piece_code(self.promotion) << 21
    }

    /// Inverse of [`Move::bits`]. Returns `None` for malformed words.
    #[must_use]
    pub fn from_bits(bits: u32) -> Option<Move> {
        let kind = *MoveKind::ALL.get((bits & 0xF) as usize)?;
        let from = Square::from_index(((bits >> 4) & 0x7F) as usize)?;
        let to = Square::from_index(((bits >> 11) & 0x7F) as usize)?;
        let captured = piece_from_code((bits >> 18) & 0x7)?;
        let promotion = piece_from_code((bits >> 21) & 0x7)?;
        if from == to || bits >> 24 != 0 {
            return None;
        }
        Some(Move::new(kind, from, to, captured, promotion))
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.from == other.from
            && self.to == other.to
            && self.captured == other.captured
            && self.promotion == other.promotion
    }
}

impl Eq for Move {}

impl std::hash::Hash for Move {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}{}", self.from, self.to)?;
        if let Some(promo) = self.promotion {
            write!(f, "={}", promo.to_char().to_ascii_uppercase())?;
        }
        if let Some(captured) = self.captured {
            write!(f, " x{}", captured.to_char())?;
        }
        if self.is_castling() {
            write!(f, " castle")?;
        }
        if self.is_en_passant() {
            write!(f, " ep")?;
        }
        write!(f, ")")
    }
}

/// Coordinate notation: `e2e4`, `e7e8q`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promo) = self.promotion {
            write!(f, "{}", promo.to_char())?;
        }
        Ok(())
    }
}

/// Capacity of one ply's move list.
pub const MAX_MOVES: usize = 256;
/// Depth of the preallocated node stack.
pub const MAX_PLY: usize = 128;

const EMPTY_MOVE: Move = Move::new(
    MoveKind::PawnPush,
    Square::from_raw(0),
    Square::from_raw(0),
    None,
    None,
);

/// List of moves with fixed-size backing array.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    #[must_use]
    pub fn new() -> Self {
        MoveList {
            moves: [EMPTY_MOVE; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, mv: Move) {
        debug_assert!(self.len < MAX_MOVES, "move list overflow");
        self.moves[self.len] = mv;
        self.len += 1;
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    /// Mutable view, for ordering code that rewrites scores or reorders.
    pub fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[must_use]
    pub fn contains(&self, mv: &Move) -> bool {
        self.iter().any(|m| m == mv)
    }

    /// Find the generated move whose packed form is `bits`.
    #[must_use]
    pub fn find_bits(&self, bits: u32) -> Option<Move> {
        self.iter().copied().find(|m| m.bits() == bits)
    }

    /// Sort by coordinate text. Only the perft divide output relies on
    /// this order.
    pub fn sort_lexical(&mut self) {
        self.as_mut_slice()
            .sort_by_cached_key(|m| m.to_string());
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MoveList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
