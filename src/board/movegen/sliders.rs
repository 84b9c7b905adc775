use super::super::geometry::GEOMETRY;
use super::super::types::{MoveKind, Piece};
use super::Generator;

impl Generator<'_> {
    /// Bishops, rooks and queens: walk each first step of the mask until
    /// the first occupied square.
    pub(super) fn slider_moves(&mut self) {
        let store = self.store;
        for piece in [Piece::Bishop, Piece::Rook, Piece::Queen] {
            let kind = MoveKind::for_piece(piece);
            for record in store.range(self.us(), piece) {
                let from = record.square;
                for first in GEOMETRY.piece_mask(piece, from) {
                    if !self.legality.pin_allows(from, first) {
                        continue;
                    }
                    let Some(dir) = GEOMETRY.direction(from, first) else {
                        continue;
                    };
                    let mut t = Some(first);
                    while let Some(to) = t {
                        if !self.step_onto(kind, from, to) {
                            break;
                        }
                        t = to.offset(dir.delta());
                    }
                }
            }
        }
    }
}
