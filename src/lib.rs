//! Chess position core: legal move generation, incremental apply and
//! reverse, position hashing, a transposition table and perft.

pub mod board;
mod perft;
pub mod sync;
pub mod tt;
mod zobrist;

pub use board::{Color, Move, MoveList, Piece, Position, Square};
pub use sync::StopFlag;
pub use tt::TranspositionTable;
