use super::super::geometry::GEOMETRY;
use super::super::types::{MoveKind, Piece};
use super::Generator;

impl Generator<'_> {
    pub(super) fn knight_moves(&mut self) {
        let store = self.store;
        for record in store.range(self.us(), Piece::Knight) {
            let from = record.square;
            // a pinned knight can never stay on its line
            if self.legality.pin(from).is_some() {
                continue;
            }
            for to in GEOMETRY.piece_mask(Piece::Knight, from) {
                self.step_onto(MoveKind::Knight, from, to);
            }
        }
    }
}
