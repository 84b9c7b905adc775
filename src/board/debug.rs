//! Consistency checks and comparable snapshots.

use std::fmt;

use super::attacks::AttackMap;
use super::types::{CastlingRights, Color, Piece, Square};
use super::Position;

/// Every tracked field of the current ply in comparable form. Piece
/// ranges compare as square sets: swap-and-shrink removal may reorder
/// slots without changing the position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub board: Vec<Option<(Color, Piece)>>,
    pub ranges: Vec<Vec<Square>>,
    attacks: AttackMap,
    pub key: u64,
    pub pawn_key: u64,
    pub piece_key: u64,
    pub material: [i32; 2],
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Position {
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let mut ranges = Vec::with_capacity(12);
        for color in Color::BOTH {
            for piece in Piece::ALL {
                let mut squares = self.squares_of(color, piece);
                squares.sort();
                ranges.push(squares);
            }
        }
        Snapshot {
            board: Square::ALL.iter().map(|&sq| self.piece_at(sq)).collect(),
            ranges,
            attacks: self.attacks.clone(),
            key: self.key(),
            pawn_key: self.pawn_key(),
            piece_key: self.piece_key(),
            material: self.material,
            side_to_move: self.side_to_move(),
            castling: self.castling_rights(),
            en_passant: self.en_passant(),
            halfmove_clock: self.halfmove_clock(),
            fullmove_number: self.fullmove_number(),
        }
    }

    /// Recompute every incremental structure from the board and compare.
    /// Returns a description of the first mismatch.
    pub fn audit(&self) -> Result<(), String> {
        self.store.check()?;
        for color in Color::BOTH {
            let kings = self.store.count(color, Piece::King);
            if kings != 1 {
                return Err(format!("{color} has {kings} kings"));
            }
        }

        let rebuilt = AttackMap::rebuild(&self.store);
        if let Some(sq) = self.attacks.first_difference(&rebuilt) {
            return Err(format!(
                "attack map differs on {sq}: {:?} incremental, {:?} rebuilt",
                self.attacks.at(sq),
                rebuilt.at(sq)
            ));
        }

        let (pawn_key, piece_key) = self.recompute_placement_keys();
        let node = self.node();
        if pawn_key != node.pawn_key {
            return Err(format!(
                "pawn key {:#018x}, expected {pawn_key:#018x}",
                node.pawn_key
            ));
        }
        if piece_key != node.piece_key {
            return Err(format!(
                "piece key {:#018x}, expected {piece_key:#018x}",
                node.piece_key
            ));
        }
        let mut expected = node.clone();
        expected.refresh_key();
        if expected.key != node.key {
            return Err(format!(
                "position key {:#018x}, expected {:#018x}",
                node.key, expected.key
            ));
        }

        let material = self.recount_material();
        if material != self.material {
            return Err(format!(
                "material {:?}, expected {material:?}",
                self.material
            ));
        }
        Ok(())
    }
}

/// ASCII board, rank 8 first, followed by the FEN.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  +-----------------+")?;
        for rank in (0..8).rev() {
            write!(f, "{} |", rank + 1)?;
            for file in 0..8 {
                let sq = Square::from_raw((rank << 4 | file) as u8);
                let ch = self
                    .piece_at(sq)
                    .map_or('.', |(color, piece)| piece.to_fen_char(color));
                write!(f, " {ch}")?;
            }
            writeln!(f, " |")?;
        }
        writeln!(f, "  +-----------------+")?;
        writeln!(f, "    a b c d e f g h")?;
        write!(f, "{}", self.to_fen())
    }
}
