//! Core chess types.
//!
//! This module contains the fundamental types used throughout the crate:
//! - `Piece` and `Color` - chess piece kinds and colors
//! - `Square` - padded 16x8 board square (u8)
//! - `Direction` - compass directions, one per attack lane
//! - `Move` and `MoveList` - move representation
//! - `CastlingRights` - castling state

mod castling;
mod direction;
mod moves;
mod piece;
mod square;

pub use castling::CastlingRights;
pub use direction::Direction;
pub use moves::{Move, MoveKind, MoveList};
pub use piece::{Color, Piece};
pub use square::{Square, SQUARE_COUNT};

pub use moves::{MAX_MOVES, MAX_PLY};
pub(crate) use piece::PROMOTION_PIECES;
