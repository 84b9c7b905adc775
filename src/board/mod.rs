//! Chess position representation and move logic.
//!
//! Squares live on a padded 16x8 grid, pieces in a fixed slot store, and
//! sliding attacks in an incrementally maintained attack map. Move
//! generation is fully legal; apply/reverse walk a preallocated node
//! stack.
//!
//! # Example
//! ```
//! use chess_core::board::Position;
//!
//! let mut position = Position::new();
//! let moves = position.generate_moves();
//! println!("Starting position has {} legal moves", moves.len());
//! ```

mod attacks;
mod debug;
mod error;
mod fen;
mod geometry;
mod make_unmake;
mod movegen;
mod pieces;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use debug::Snapshot;
pub use error::{FenError, MoveParseError, SquareError};
pub use state::Position;
pub use types::{
    CastlingRights, Color, Direction, Move, MoveKind, MoveList, Piece, Square, SQUARE_COUNT,
};

pub use types::{MAX_MOVES, MAX_PLY};
