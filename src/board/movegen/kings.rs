use super::super::geometry::GEOMETRY;
use super::super::types::{MoveKind, Piece, Square};
use super::{is_attacked, Generator};

impl Generator<'_> {
    pub(super) fn king_moves(&mut self) {
        let from = self.legality.king;
        for to in GEOMETRY.piece_mask(Piece::King, from) {
            let captured = match self.store.at(to) {
                Some(r) if r.color == self.us() => continue,
                Some(r) => Some(r.piece),
                None => None,
            };
            if self.king_can_stand(to) {
                self.push(MoveKind::King, from, to, captured, None);
            }
        }
    }

    /// Destination safety. The attack map still shows the king on its
    /// origin, so squares it shadows from a checking slider come from
    /// the x-ray set instead.
    fn king_can_stand(&self, to: Square) -> bool {
        !self.legality.xray.contains(to)
            && !is_attacked(self.store, self.attacks, to, self.us().opponent())
    }

    /// Only called when not in check, so the king's origin is known safe.
    pub(super) fn castling_moves(&mut self) {
        let us = self.us();
        let rank = us.back_rank();
        let home = Square::from_raw((rank << 4 | 4) as u8);
        if self.legality.king != home {
            return;
        }
        let on_rank = |file: usize| Square::from_raw((rank << 4 | file) as u8);

        if self.castling.has(us, true)
            && self.path_clear(&[on_rank(5), on_rank(6)], &[on_rank(5), on_rank(6)])
        {
            debug_assert!(self.store.is_piece(on_rank(7), us, Piece::Rook));
            self.push(MoveKind::CastleShort, home, on_rank(6), None, None);
        }
        if self.castling.has(us, false)
            && self.path_clear(
                &[on_rank(1), on_rank(2), on_rank(3)],
                &[on_rank(3), on_rank(2)],
            )
        {
            debug_assert!(self.store.is_piece(on_rank(0), us, Piece::Rook));
            self.push(MoveKind::CastleLong, home, on_rank(2), None, None);
        }
    }

    fn path_clear(&self, empty: &[Square], safe: &[Square]) -> bool {
        let them = self.us().opponent();
        empty.iter().all(|&sq| self.store.is_empty(sq))
            && safe
                .iter()
                .all(|&sq| !is_attacked(self.store, self.attacks, sq, them))
    }
}
