//! Precomputed square geometry: Chebyshev distance, compass direction
//! between collinear squares, and per-square destination masks for every
//! piece kind.
//!
//! A mask packs up to eight destinations into one `u64`, one byte lane
//! per destination holding `square + 1`; the first zero lane ends the
//! list. Slider masks hold only the first step in each reachable
//! direction, the walk itself happens at the use site.

use once_cell::sync::Lazy;

use super::types::{Color, Direction, Piece, Square, SQUARE_COUNT};

const NO_DIRECTION: u8 = 0xFF;

const KNIGHT_DELTAS: [i8; 8] = [33, 31, 18, 14, -14, -18, -31, -33];

/// Packed destination list for one square.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct MoveMask(u64);

impl MoveMask {
    /// Pack destinations in order. More than eight is a table bug.
    fn pack(from: Square, targets: impl IntoIterator<Item = Square>) -> Self {
        let mut bits = 0u64;
        for (lane, target) in targets.into_iter().enumerate() {
            if lane >= 8 {
                panic!("geometry: more than 8 destinations from {from}");
            }
            bits |= (target.index() as u64 + 1) << (lane * 8);
        }
        MoveMask(bits)
    }

    #[inline]
    pub(crate) fn iter(self) -> MaskIter {
        MaskIter(self.0)
    }

    #[cfg(test)]
    pub(crate) fn contains(self, sq: Square) -> bool {
        self.iter().any(|s| s == sq)
    }

    #[cfg(test)]
    pub(crate) fn len(self) -> usize {
        self.iter().count()
    }

    /// Self-check run once per mask at build time. Any failure means the
    /// tables are corrupt and nothing downstream can be trusted.
    fn verify(self, from: Square, label: &str) {
        let mut seen = [false; SQUARE_COUNT];
        let mut lanes = 0;
        let mut bits = self.0;
        while bits & 0xFF != 0 {
            let raw = (bits & 0xFF) as usize - 1;
            let target = Square::from_index(raw)
                .unwrap_or_else(|| panic!("geometry: {label} mask of {from} leaves the board"));
            if target == from {
                panic!("geometry: {label} mask of {from} contains its source");
            }
            if seen[target.index()] {
                panic!("geometry: {label} mask of {from} repeats {target}");
            }
            seen[target.index()] = true;
            lanes += 1;
            bits >>= 8;
        }
        if bits != 0 || lanes > 8 {
            panic!("geometry: {label} mask of {from} is not terminated");
        }
    }
}

impl IntoIterator for MoveMask {
    type Item = Square;
    type IntoIter = MaskIter;

    fn into_iter(self) -> MaskIter {
        self.iter()
    }
}

/// Iterator over the lanes of a [`MoveMask`].
pub(crate) struct MaskIter(u64);

impl Iterator for MaskIter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        let lane = (self.0 & 0xFF) as u8;
        if lane == 0 {
            return None;
        }
        self.0 >>= 8;
        Some(Square::from_raw(lane - 1))
    }
}

pub(crate) struct Geometry {
    distance: Box<[[u8; SQUARE_COUNT]; SQUARE_COUNT]>,
    direction: Box<[[u8; SQUARE_COUNT]; SQUARE_COUNT]>,
    pawn_captures: [[MoveMask; SQUARE_COUNT]; 2],
    knight: [MoveMask; SQUARE_COUNT],
    bishop: [MoveMask; SQUARE_COUNT],
    rook: [MoveMask; SQUARE_COUNT],
    queen: [MoveMask; SQUARE_COUNT],
    king: [MoveMask; SQUARE_COUNT],
}

pub(crate) static GEOMETRY: Lazy<Geometry> = Lazy::new(Geometry::build);

fn chebyshev(a: Square, b: Square) -> u8 {
    let dr = a.rank().abs_diff(b.rank());
    let df = a.file().abs_diff(b.file());
    dr.max(df) as u8
}

fn compass(a: Square, b: Square) -> Option<Direction> {
    if a == b {
        return None;
    }
    let dr = b.rank() as i32 - a.rank() as i32;
    let df = b.file() as i32 - a.file() as i32;
    if dr != 0 && df != 0 && dr.abs() != df.abs() {
        return None;
    }
    let dir = match (dr.signum(), df.signum()) {
        (1, 0) => Direction::North,
        (1, 1) => Direction::NorthEast,
        (0, 1) => Direction::East,
        (-1, 1) => Direction::SouthEast,
        (-1, 0) => Direction::South,
        (-1, -1) => Direction::SouthWest,
        (0, -1) => Direction::West,
        _ => Direction::NorthWest,
    };
    Some(dir)
}

fn steps(from: Square, deltas: &[i8]) -> MoveMask {
    MoveMask::pack(from, deltas.iter().filter_map(|&d| from.offset(d)))
}

fn first_steps(from: Square, dirs: &[Direction]) -> MoveMask {
    MoveMask::pack(from, dirs.iter().filter_map(|d| from.offset(d.delta())))
}

impl Geometry {
    fn build() -> Self {
        let mut geo = Geometry {
            distance: Box::new([[0; SQUARE_COUNT]; SQUARE_COUNT]),
            direction: Box::new([[NO_DIRECTION; SQUARE_COUNT]; SQUARE_COUNT]),
            pawn_captures: [[MoveMask::default(); SQUARE_COUNT]; 2],
            knight: [MoveMask::default(); SQUARE_COUNT],
            bishop: [MoveMask::default(); SQUARE_COUNT],
            rook: [MoveMask::default(); SQUARE_COUNT],
            queen: [MoveMask::default(); SQUARE_COUNT],
            king: [MoveMask::default(); SQUARE_COUNT],
        };

        let king_deltas: Vec<i8> = Direction::ALL.iter().map(|d| d.delta()).collect();

        for a in Square::ALL {
            for b in Square::ALL {
                geo.distance[a.index()][b.index()] = chebyshev(a, b);
                geo.direction[a.index()][b.index()] =
                    compass(a, b).map_or(NO_DIRECTION, |d| d.index() as u8);
            }

            let i = a.index();
            geo.pawn_captures[Color::White.index()][i] = steps(a, &[15, 17]);
            geo.pawn_captures[Color::Black.index()][i] = steps(a, &[-17, -15]);
            geo.knight[i] = steps(a, &KNIGHT_DELTAS);
            geo.king[i] = steps(a, &king_deltas);
            geo.bishop[i] = first_steps(a, &Direction::DIAGONAL);
            geo.rook[i] = first_steps(a, &Direction::ORTHOGONAL);
            geo.queen[i] = first_steps(a, &Direction::ALL);

            geo.pawn_captures[0][i].verify(a, "white pawn");
            geo.pawn_captures[1][i].verify(a, "black pawn");
            geo.knight[i].verify(a, "knight");
            geo.king[i].verify(a, "king");
            geo.bishop[i].verify(a, "bishop");
            geo.rook[i].verify(a, "rook");
            geo.queen[i].verify(a, "queen");
        }

        log::trace!("geometry tables built");
        geo
    }

    #[inline]
    pub(crate) fn distance(&self, a: Square, b: Square) -> u8 {
        self.distance[a.index()][b.index()]
    }

    #[inline]
    pub(crate) fn direction(&self, a: Square, b: Square) -> Option<Direction> {
        let raw = self.direction[a.index()][b.index()];
        if raw == NO_DIRECTION {
            None
        } else {
            Some(Direction::from_index(raw as usize))
        }
    }

    /// True when `mid` lies strictly between `a` and `b` on a line.
    #[inline]
    pub(crate) fn between(&self, a: Square, mid: Square, b: Square) -> bool {
        match self.direction(a, b) {
            Some(dir) => {
                self.direction(a, mid) == Some(dir) && self.distance(a, mid) < self.distance(a, b)
            }
            None => false,
        }
    }

    #[inline]
    pub(crate) fn pawn_captures(&self, color: Color, sq: Square) -> MoveMask {
        self.pawn_captures[color.index()][sq.index()]
    }

    /// Destination mask for a non-pawn piece. For sliders this is the
    /// first step in each direction.
    #[inline]
    pub(crate) fn piece_mask(&self, piece: Piece, sq: Square) -> MoveMask {
        let i = sq.index();
        match piece {
            Piece::Knight => self.knight[i],
            Piece::Bishop => self.bishop[i],
            Piece::Rook => self.rook[i],
            Piece::Queen => self.queen[i],
            Piece::King => self.king[i],
            Piece::Pawn => MoveMask::default(),
        }
    }
}
