//! Compass directions on the padded grid.

/// One of the eight compass directions. The discriminant doubles as the
/// lane index in attack words; opposite directions are four lanes apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub const DIAGONAL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    #[must_use]
    pub const fn from_index(index: usize) -> Direction {
        Direction::ALL[index & 7]
    }

    /// Padded-grid step for this direction.
    #[inline]
    #[must_use]
    pub const fn delta(self) -> i8 {
        match self {
            Direction::North => 16,
            Direction::NorthEast => 17,
            Direction::East => 1,
            Direction::SouthEast => -15,
            Direction::South => -16,
            Direction::SouthWest => -17,
            Direction::West => -1,
            Direction::NorthWest => 15,
        }
    }

    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Direction {
        Direction::from_index(self.index() + 4)
    }

    #[inline]
    #[must_use]
    pub const fn is_diagonal(self) -> bool {
        self.index() & 1 == 1
    }

    /// True when `other` lies on the same line (same or opposite heading).
    #[inline]
    #[must_use]
    pub const fn same_line(self, other: Direction) -> bool {
        self.index() & 3 == other.index() & 3
    }
}
