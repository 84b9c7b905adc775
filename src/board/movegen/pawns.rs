use super::super::geometry::GEOMETRY;
use super::super::types::{MoveKind, Piece, Square, PROMOTION_PIECES};
use super::Generator;

impl Generator<'_> {
    pub(super) fn pawn_moves(&mut self) {
        let store = self.store;
        let us = self.us();
        let step = us.pawn_step();

        for record in store.range(us, Piece::Pawn) {
            let from = record.square;

            if let Some(one) = from.offset(step).filter(|&s| store.is_empty(s)) {
                if self.legality.allows(from, one) {
                    self.pawn_move(MoveKind::PawnPush, from, one, None);
                }
                if from.rank() == us.pawn_start_rank() {
                    if let Some(two) = one.offset(step).filter(|&s| store.is_empty(s)) {
                        if self.legality.allows(from, two) {
                            self.push(MoveKind::PawnDoublePush, from, two, None, None);
                        }
                    }
                }
            }

            for to in GEOMETRY.pawn_captures(us, from) {
                match store.at(to) {
                    Some(r) if r.color != us => {
                        if self.legality.allows(from, to) {
                            self.pawn_move(MoveKind::PawnCapture, from, to, Some(r.piece));
                        }
                    }
                    None if self.en_passant == Some(to) => self.en_passant_capture(from, to),
                    _ => {}
                }
            }
        }
    }

    /// Emit a pawn move, fanning out into the four promotions on the
    /// last rank.
    fn pawn_move(&mut self, kind: MoveKind, from: Square, to: Square, captured: Option<Piece>) {
        if to.rank() == self.us().pawn_promotion_rank() {
            for promo in PROMOTION_PIECES {
                self.push(kind, from, to, captured, Some(promo));
            }
        } else {
            self.push(kind, from, to, captured, None);
        }
    }

    fn en_passant_capture(&mut self, from: Square, to: Square) {
        let Some(cap) = to.offset(-self.us().pawn_step()) else {
            return;
        };
        debug_assert!(self.store.is_piece(cap, self.us().opponent(), Piece::Pawn));
        // in check: either the double-pushed pawn is the checker or the
        // landing square blocks the checking line
        let targets = self.legality.targets;
        if !(targets.contains(cap) || targets.contains(to)) {
            return;
        }
        if !self.legality.pin_allows(from, to) || self.en_passant_exposes_king(from, cap, to) {
            return;
        }
        self.push(MoveKind::EnPassant, from, to, Some(Piece::Pawn), None);
    }

    /// En passant empties two squares at once, which the pin scan cannot
    /// see. For each enemy slider line that reaches `from` or `cap`,
    /// continue it past that square with `from` and `cap` treated as
    /// empty and `to` as occupied. Reaching the own king makes the
    /// capture illegal.
    fn en_passant_exposes_king(&self, from: Square, cap: Square, to: Square) -> bool {
        let them = self.us().opponent();
        let king = self.legality.king;

        for x in [from, cap] {
            for (dir, attacker) in self.attacks.at(x).iter() {
                if self.store.color_at(attacker) != Some(them)
                    || GEOMETRY.between(attacker, to, x)
                {
                    continue;
                }
                let mut t = x.offset(dir.delta());
                while let Some(sq) = t {
                    if sq == king {
                        return true;
                    }
                    if sq == to || (sq != from && sq != cap && !self.store.is_empty(sq)) {
                        break;
                    }
                    t = sq.offset(dir.delta());
                }
            }
        }
        false
    }
}
