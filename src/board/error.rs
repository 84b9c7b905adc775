//! Error types for chess board operations.

use std::fmt;

use super::types::{Color, Piece, Square};

/// Error type for FEN parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN string has too few parts (needs at least 4)
    TooFewParts { found: usize },
    /// Invalid piece character in position string
    InvalidPiece { char: char },
    /// Invalid castling character
    InvalidCastling { char: char },
    /// Invalid side to move (must be 'w' or 'b')
    InvalidSideToMove { found: String },
    /// Invalid en passant square
    InvalidEnPassant { found: String },
    /// Placement field does not have exactly 8 ranks
    WrongRankCount { found: usize },
    /// Too many files in a rank
    TooManyFiles { rank: usize, files: usize },
    /// Too few files in a rank
    TooFewFiles { rank: usize, files: usize },
    /// More pieces of one kind than a side can ever own
    TooManyPieces {
        color: Color,
        piece: Piece,
        max: usize,
    },
    /// A side without exactly one king
    KingCount { color: Color, found: usize },
    /// Pawn on the first or last rank
    PawnOnBackRank { square: Square },
    /// En passant target on a rank that cannot follow a double push
    EnPassantWrongRank { square: Square },
    /// En passant target or the square behind it is occupied
    EnPassantOccupied { square: Square },
    /// No enemy pawn in front of the en passant target
    EnPassantNoPawn { square: Square },
    /// The side not to move is in check
    OpponentInCheck,
    /// Halfmove or fullmove field is not a number
    InvalidClock { found: String },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::TooFewParts { found } => {
                write!(f, "FEN must have at least 4 parts, found {found}")
            }
            FenError::InvalidPiece { char } => {
                write!(f, "Invalid piece character '{char}' in FEN")
            }
            FenError::InvalidCastling { char } => {
                write!(f, "Invalid castling character '{char}' in FEN")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "Invalid side to move '{found}', expected 'w' or 'b'")
            }
            FenError::InvalidEnPassant { found } => {
                write!(f, "Invalid en passant square '{found}'")
            }
            FenError::WrongRankCount { found } => {
                write!(f, "FEN placement must have 8 ranks, found {found}")
            }
            FenError::TooManyFiles { rank, files } => {
                write!(f, "Too many files ({files}) in rank {rank}")
            }
            FenError::TooFewFiles { rank, files } => {
                write!(f, "Too few files ({files}) in rank {rank}")
            }
            FenError::TooManyPieces { color, piece, max } => {
                write!(f, "{color} has more than {max} {piece:?} pieces")
            }
            FenError::KingCount { color, found } => {
                write!(f, "{color} must have exactly one king, found {found}")
            }
            FenError::PawnOnBackRank { square } => {
                write!(f, "Pawn on back rank square {square}")
            }
            FenError::EnPassantWrongRank { square } => {
                write!(f, "En passant square {square} is on the wrong rank")
            }
            FenError::EnPassantOccupied { square } => {
                write!(f, "En passant square {square} or its origin is occupied")
            }
            FenError::EnPassantNoPawn { square } => {
                write!(f, "No pawn can have double-pushed past {square}")
            }
            FenError::OpponentInCheck => {
                write!(f, "Side not to move is in check")
            }
            FenError::InvalidClock { found } => {
                write!(f, "Invalid move clock '{found}'")
            }
        }
    }
}

impl std::error::Error for FenError {}

/// Error type for move parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    /// Move string has invalid length (must be 4-5 characters)
    InvalidLength { len: usize },
    /// Invalid square notation in move
    InvalidSquare { notation: String },
    /// Invalid promotion piece
    InvalidPromotion { char: char },
    /// Move is not legal in the current position
    IllegalMove { notation: String },
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::InvalidLength { len } => {
                write!(f, "Move must be 4-5 characters, found {len}")
            }
            MoveParseError::InvalidSquare { notation } => {
                write!(f, "Invalid square notation in '{notation}'")
            }
            MoveParseError::InvalidPromotion { char } => {
                write!(f, "Invalid promotion piece '{char}'")
            }
            MoveParseError::IllegalMove { notation } => {
                write!(f, "Illegal move '{notation}'")
            }
        }
    }
}

impl std::error::Error for MoveParseError {}

/// Error type for square parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    /// Rank out of bounds (must be 0-7)
    RankOutOfBounds { rank: usize },
    /// File out of bounds (must be 0-7)
    FileOutOfBounds { file: usize },
    /// Invalid algebraic notation
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::RankOutOfBounds { rank } => {
                write!(f, "Rank {rank} out of bounds (must be 0-7)")
            }
            SquareError::FileOutOfBounds { file } => {
                write!(f, "File {file} out of bounds (must be 0-7)")
            }
            SquareError::InvalidNotation { notation } => {
                write!(f, "Invalid square notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for SquareError {}

#[cfg(test)]
mod tests {
    use super::*;

    // FenError tests
    #[test]
    fn test_fen_error_too_few_parts() {
        let err = FenError::TooFewParts { found: 2 };
        assert!(err.to_string().contains('2'));
        assert!(err.to_string().contains('4'));
    }

    #[test]
    fn test_fen_error_invalid_piece() {
        let err = FenError::InvalidPiece { char: 'z' };
        assert!(err.to_string().contains("'z'"));
    }

    #[test]
    fn test_fen_error_king_count() {
        let err = FenError::KingCount {
            color: Color::Black,
            found: 0,
        };
        assert!(err.to_string().contains("Black"));
        assert!(err.to_string().contains('0'));
    }

    #[test]
    fn test_fen_error_names_square() {
        let square: Square = "d6".parse().unwrap();
        let err = FenError::EnPassantNoPawn { square };
        assert!(err.to_string().contains("d6"));
        let err = FenError::PawnOnBackRank {
            square: "a8".parse().unwrap(),
        };
        assert!(err.to_string().contains("a8"));
    }

    #[test]
    fn test_fen_error_too_many_pieces() {
        let err = FenError::TooManyPieces {
            color: Color::White,
            piece: Piece::Queen,
            max: 9,
        };
        assert!(err.to_string().contains('9'));
        assert!(err.to_string().contains("Queen"));
    }

    #[test]
    fn test_fen_error_equality() {
        let err1 = FenError::TooFewParts { found: 2 };
        let err2 = FenError::TooFewParts { found: 2 };
        assert_eq!(err1, err2);
        assert_ne!(err1, FenError::OpponentInCheck);
    }

    // MoveParseError tests
    #[test]
    fn test_move_error_invalid_length() {
        let err = MoveParseError::InvalidLength { len: 3 };
        assert!(err.to_string().contains('3'));
    }

    #[test]
    fn test_move_error_illegal_move() {
        let err = MoveParseError::IllegalMove {
            notation: "e2e5".to_string(),
        };
        assert!(err.to_string().contains("e2e5"));
    }

    // SquareError tests
    #[test]
    fn test_square_error_rank_bounds() {
        let err = SquareError::RankOutOfBounds { rank: 9 };
        assert!(err.to_string().contains('9'));
    }

    #[test]
    fn test_square_error_invalid_notation() {
        let err = SquareError::InvalidNotation {
            notation: "xyz".to_string(),
        };
        assert!(err.to_string().contains("xyz"));
    }
}
