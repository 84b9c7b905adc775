use std::str::FromStr;

use super::error::{FenError, MoveParseError};
use super::types::{CastlingRights, Color, Move, Piece, Square};
use super::Position;

/// Corner square of the rook a castling right refers to.
fn rook_home(color: Color, kingside: bool) -> Square {
    let file = if kingside { 7 } else { 0 };
    Square::from_raw((color.back_rank() << 4 | file) as u8)
}

fn king_home(color: Color) -> Square {
    Square::from_raw((color.back_rank() << 4 | 4) as u8)
}

fn parse_clock(field: Option<&&str>, default: u32) -> Result<u32, FenError> {
    match field {
        None => Ok(default),
        Some(text) => text.parse().map_err(|_| FenError::InvalidClock {
            found: (*text).to_string(),
        }),
    }
}

impl Position {
    /// Parse a board position from FEN notation.
    ///
    /// Rejects structurally impossible positions: wrong piece counts, a
    /// missing or extra king, pawns on the back ranks, an en passant
    /// square no double push could have produced, or the side not to
    /// move standing in check.
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        Self::parse_fen(fen).map_err(|err| {
            log::debug!("rejected FEN {fen:?}: {err}");
            err
        })
    }

    fn parse_fen(fen: &str) -> Result<Self, FenError> {
        let mut position = Position::empty();
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        // Parse piece placement
        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount { found: ranks.len() });
        }
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx;
            let mut file = 0;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    file += skip as usize;
                    continue;
                }
                let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                if file >= 8 {
                    return Err(FenError::TooManyFiles {
                        rank: rank_idx,
                        files: file + 1,
                    });
                }
                let square = Square::from_raw((rank << 4 | file) as u8);
                let count = position.store.count(color, piece);
                if count == piece.max_count() {
                    return Err(if piece == Piece::King {
                        FenError::KingCount {
                            color,
                            found: count + 1,
                        }
                    } else {
                        FenError::TooManyPieces {
                            color,
                            piece,
                            max: piece.max_count(),
                        }
                    });
                }
                if piece == Piece::Pawn && (rank == 0 || rank == 7) {
                    return Err(FenError::PawnOnBackRank { square });
                }
                position.store.add(color, piece, square);
                file += 1;
            }
            if file > 8 {
                return Err(FenError::TooManyFiles {
                    rank: rank_idx,
                    files: file,
                });
            }
            if file < 8 {
                return Err(FenError::TooFewFiles {
                    rank: rank_idx,
                    files: file,
                });
            }
        }
        for color in Color::BOTH {
            let found = position.store.count(color, Piece::King);
            if found != 1 {
                return Err(FenError::KingCount { color, found });
            }
        }

        // Parse side to move
        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        // Parse castling rights
        let mut castling = CastlingRights::none();
        for c in parts[2].chars() {
            match c {
                'K' => castling.set(Color::White, true),
                'Q' => castling.set(Color::White, false),
                'k' => castling.set(Color::Black, true),
                'q' => castling.set(Color::Black, false),
                '-' => {}
                _ => return Err(FenError::InvalidCastling { char: c }),
            }
        }
        for color in Color::BOTH {
            for kingside in [true, false] {
                if castling.has(color, kingside)
                    && !(position.store.is_piece(king_home(color), color, Piece::King)
                        && position
                            .store
                            .is_piece(rook_home(color, kingside), color, Piece::Rook))
                {
                    log::warn!(
                        "dropping {color} {} castling right: king or rook not at home",
                        if kingside { "short" } else { "long" }
                    );
                    castling.remove(color, kingside);
                }
            }
        }

        // Parse en passant target
        let en_passant = if parts[3] == "-" {
            None
        } else {
            let square: Square = parts[3].parse().map_err(|_| FenError::InvalidEnPassant {
                found: parts[3].to_string(),
            })?;
            position.check_en_passant(square, side_to_move)?;
            Some(square)
        };

        let halfmove_clock = parse_clock(parts.get(4), 0)?;
        let fullmove_number = parse_clock(parts.get(5), 1)?.max(1);

        let root = &mut position.nodes[0];
        root.side_to_move = side_to_move;
        root.castling = castling;
        root.en_passant = en_passant;
        root.halfmove_clock = halfmove_clock;
        root.fullmove_number = fullmove_number;
        position.finish_setup();

        if position.opponent_in_check() {
            return Err(FenError::OpponentInCheck);
        }
        Ok(position)
    }

    /// The target must sit behind an enemy pawn that could just have
    /// double-pushed past it.
    fn check_en_passant(&self, square: Square, side_to_move: Color) -> Result<(), FenError> {
        let them = side_to_move.opponent();
        let expected_rank = if side_to_move == Color::White { 5 } else { 2 };
        if square.rank() != expected_rank {
            return Err(FenError::EnPassantWrongRank { square });
        }
        let origin = square.offset(-them.pawn_step());
        let pawn = square.offset(them.pawn_step());
        if !self.store.is_empty(square) || origin.is_some_and(|s| !self.store.is_empty(s)) {
            return Err(FenError::EnPassantOccupied { square });
        }
        if !pawn.is_some_and(|s| self.store.is_piece(s, them, Piece::Pawn)) {
            return Err(FenError::EnPassantNoPawn { square });
        }
        Ok(())
    }

    /// Parse a board position from FEN notation.
    ///
    /// # Panics
    /// Panics if the FEN string is invalid. Use `try_from_fen` for fallible parsing.
    #[must_use]
    pub fn from_fen(fen: &str) -> Self {
        Self::try_from_fen(fen).expect("Invalid FEN string")
    }

    /// Convert the current ply's position to FEN notation.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows: Vec<String> = Vec::new();
        for rank in (0..8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8 {
                let sq = Square::from_raw((rank << 4 | file) as u8);
                if let Some((color, piece)) = self.piece_at(sq) {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(piece.to_fen_char(color));
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let active = match self.side_to_move() {
            Color::White => "w",
            Color::Black => "b",
        };
        let rights = self.castling_rights();
        let mut castling = String::new();
        for (color, kingside, c) in [
            (Color::White, true, 'K'),
            (Color::White, false, 'Q'),
            (Color::Black, true, 'k'),
            (Color::Black, false, 'q'),
        ] {
            if rights.has(color, kingside) {
                castling.push(c);
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }
        let ep = self
            .en_passant()
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            rows.join("/"),
            active,
            castling,
            ep,
            self.halfmove_clock(),
            self.fullmove_number()
        )
    }

    /// Parse a move in coordinate notation (e.g., "e2e4", "e7e8q").
    ///
    /// Returns the matching legal move if found, or an error describing why parsing failed.
    ///
    /// # Example
    /// ```
    /// use chess_core::board::Position;
    ///
    /// let position = Position::new();
    /// let mv = position.parse_move("e2e4").unwrap();
    /// assert_eq!(mv.to_string(), "e2e4");
    /// ```
    pub fn parse_move(&self, text: &str) -> Result<Move, MoveParseError> {
        if text.len() < 4 || text.len() > 5 {
            return Err(MoveParseError::InvalidLength { len: text.len() });
        }

        let invalid_square = || MoveParseError::InvalidSquare {
            notation: text.to_string(),
        };
        let from: Square = text
            .get(0..2)
            .and_then(|s| s.parse().ok())
            .ok_or_else(invalid_square)?;
        let to: Square = text
            .get(2..4)
            .and_then(|s| s.parse().ok())
            .ok_or_else(invalid_square)?;

        // Parse promotion piece if present
        let promotion = match text.get(4..).and_then(|s| s.chars().next()) {
            None => None,
            Some(c) => match Piece::from_char(c) {
                Some(piece) if !matches!(piece, Piece::Pawn | Piece::King) => Some(piece),
                _ => return Err(MoveParseError::InvalidPromotion { char: c }),
            },
        };

        self.legal_moves()
            .iter()
            .copied()
            .find(|m| m.from() == from && m.to() == to && m.promotion() == promotion)
            .ok_or_else(|| MoveParseError::IllegalMove {
                notation: text.to_string(),
            })
    }

    /// Parse a coordinate move and play it as a game move: the result
    /// becomes the new root.
    ///
    /// # Example
    /// ```
    /// use chess_core::board::Position;
    ///
    /// let mut position = Position::new();
    /// position.play("e2e4").unwrap();
    /// position.play("e7e5").unwrap();
    /// assert_eq!(position.fullmove_number(), 2);
    /// ```
    pub fn play(&mut self, text: &str) -> Result<Move, MoveParseError> {
        let mv = self.parse_move(text)?;
        self.commit(mv);
        Ok(mv)
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::try_from_fen(s)
    }
}
