//! Incremental slider attack map.
//!
//! Every square carries one packed word with a byte lane per compass
//! direction. Lane `d` of square `t` holds `s + 1` where `s` is the
//! nearest bishop, rook or queen that reaches `t` moving in direction `d`
//! over empty squares only; zero means no such slider. The ray includes
//! its first blocker, so occupied squares record who attacks them.
//!
//! Moves never rebuild the map. They call the four primitives below on
//! the few squares whose visibility changed:
//! - [`AttackMap::add_from`] / [`AttackMap::clear_from`] for a slider
//!   that appears or disappears,
//! - [`AttackMap::truncate`] for a square that just became occupied,
//! - [`AttackMap::extend`] for a square that just became empty.

use super::geometry::GEOMETRY;
use super::pieces::PieceStore;
use super::types::{Direction, Square, SQUARE_COUNT};

/// Eight attacker lanes of one square.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Rays(u64);

impl Rays {
    #[inline]
    pub(crate) fn lane(self, dir: Direction) -> Option<Square> {
        match (self.0 >> (dir.index() * 8)) as u8 {
            0 => None,
            raw => Some(Square::from_raw(raw - 1)),
        }
    }

    #[inline]
    fn set(&mut self, dir: Direction, attacker: Square) {
        let shift = dir.index() * 8;
        self.0 = (self.0 & !(0xFF << shift)) | ((attacker.index() as u64 + 1) << shift);
    }

    #[inline]
    fn clear(&mut self, dir: Direction) {
        self.0 &= !(0xFF << (dir.index() * 8));
    }

    #[cfg(test)]
    pub(crate) fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Set lanes as (direction, attacker) pairs.
    pub(crate) fn iter(self) -> impl Iterator<Item = (Direction, Square)> {
        Direction::ALL
            .into_iter()
            .filter_map(move |d| self.lane(d).map(|s| (d, s)))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct AttackMap {
    rays: [Rays; SQUARE_COUNT],
}

impl AttackMap {
    pub(crate) fn new() -> Self {
        AttackMap {
            rays: [Rays::default(); SQUARE_COUNT],
        }
    }

    /// Rebuild from scratch for the current board.
    pub(crate) fn rebuild(store: &PieceStore) -> Self {
        let mut map = AttackMap::new();
        for record in store.iter().filter(|r| r.piece.is_slider()) {
            map.add_from(store, record.square);
        }
        map
    }

    #[inline]
    pub(crate) fn at(&self, sq: Square) -> Rays {
        self.rays[sq.index()]
    }

    /// Record the slider on `from` as attacker along each of its lines.
    pub(crate) fn add_from(&mut self, store: &PieceStore, from: Square) {
        let Some(record) = store.at(from) else {
            debug_assert!(false, "add_from on empty {from}");
            return;
        };
        for first in GEOMETRY.piece_mask(record.piece, from) {
            let Some(dir) = GEOMETRY.direction(from, first) else {
                continue;
            };
            let mut t = Some(first);
            while let Some(sq) = t {
                self.rays[sq.index()].set(dir, from);
                if !store.is_empty(sq) {
                    break;
                }
                t = sq.offset(dir.delta());
            }
        }
    }

    /// Remove the slider on `from` from every lane it occupies. Must run
    /// while the board still shows the slider's current lines.
    pub(crate) fn clear_from(&mut self, store: &PieceStore, from: Square) {
        let Some(record) = store.at(from) else {
            debug_assert!(false, "clear_from on empty {from}");
            return;
        };
        for first in GEOMETRY.piece_mask(record.piece, from) {
            let Some(dir) = GEOMETRY.direction(from, first) else {
                continue;
            };
            let mut t = Some(first);
            while let Some(sq) = t {
                debug_assert_eq!(self.rays[sq.index()].lane(dir), Some(from));
                self.rays[sq.index()].clear(dir);
                if !store.is_empty(sq) {
                    break;
                }
                t = sq.offset(dir.delta());
            }
        }
    }

    /// `square` was just occupied: every line that ran through it now
    /// ends there. Clears lanes beyond it up to and including the next
    /// occupied square, or `stop` if that comes first.
    pub(crate) fn truncate(&mut self, store: &PieceStore, square: Square, stop: Option<Square>) {
        for (dir, _) in self.rays[square.index()].iter() {
            let mut t = square.offset(dir.delta());
            while let Some(sq) = t {
                self.rays[sq.index()].clear(dir);
                if Some(sq) == stop || !store.is_empty(sq) {
                    break;
                }
                t = sq.offset(dir.delta());
            }
        }
    }

    /// `square` was just emptied: every line that ended there now runs on
    /// to the next occupied square.
    pub(crate) fn extend(&mut self, store: &PieceStore, square: Square) {
        for (dir, attacker) in self.rays[square.index()].iter() {
            let mut t = square.offset(dir.delta());
            while let Some(sq) = t {
                self.rays[sq.index()].set(dir, attacker);
                if !store.is_empty(sq) {
                    break;
                }
                t = sq.offset(dir.delta());
            }
        }
    }

    /// First square whose lanes differ from `other`.
    pub(crate) fn first_difference(&self, other: &AttackMap) -> Option<Square> {
        Square::ALL
            .into_iter()
            .find(|s| self.rays[s.index()] != other.rays[s.index()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::types::{Color, Piece};

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn store_with(pieces: &[(&str, Color, Piece)]) -> PieceStore {
        let mut store = PieceStore::new();
        for &(s, c, p) in pieces {
            store.add(c, p, sq(s));
        }
        store
    }

    #[test]
    fn test_rook_ray_stops_at_blocker() {
        let store = store_with(&[
            ("a1", Color::White, Piece::Rook),
            ("a5", Color::Black, Piece::Knight),
        ]);
        let map = AttackMap::rebuild(&store);
        assert_eq!(map.at(sq("a4")).lane(Direction::North), Some(sq("a1")));
        assert_eq!(map.at(sq("a5")).lane(Direction::North), Some(sq("a1")));
        assert_eq!(map.at(sq("a6")).lane(Direction::North), None);
        assert_eq!(map.at(sq("h1")).lane(Direction::East), Some(sq("a1")));
        assert!(map.at(sq("b2")).is_empty());
    }

    #[test]
    fn test_truncate_then_extend_matches_rebuild() {
        let mut store = store_with(&[
            ("a1", Color::White, Piece::Queen),
            ("h8", Color::Black, Piece::Bishop),
        ]);
        let mut map = AttackMap::rebuild(&store);

        store.add(Color::White, Piece::Pawn, sq("d4"));
        map.truncate(&store, sq("d4"), None);
        assert_eq!(map, AttackMap::rebuild(&store));

        store.relocate(sq("d4"), sq("d5"));
        map.truncate(&store, sq("d5"), Some(sq("d4")));
        map.extend(&store, sq("d4"));
        assert_eq!(map, AttackMap::rebuild(&store));

        store.remove(sq("d5"));
        map.extend(&store, sq("d5"));
        assert_eq!(map, AttackMap::rebuild(&store));
    }

    #[test]
    fn test_clear_and_add_slider() {
        let mut store = store_with(&[
            ("d1", Color::White, Piece::Rook),
            ("d8", Color::Black, Piece::Rook),
        ]);
        let mut map = AttackMap::rebuild(&store);

        map.clear_from(&store, sq("d1"));
        store.relocate(sq("d1"), sq("d4"));
        map.truncate(&store, sq("d4"), Some(sq("d1")));
        map.extend(&store, sq("d1"));
        map.add_from(&store, sq("d4"));

        assert_eq!(map.first_difference(&AttackMap::rebuild(&store)), None);
        assert_eq!(map.at(sq("d4")).lane(Direction::South), Some(sq("d8")));
        assert_eq!(map.at(sq("d1")).lane(Direction::South), Some(sq("d4")));
    }
}
