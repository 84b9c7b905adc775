//! Legal move generation.
//!
//! Check and pin facts are gathered once per call from the attack map
//! ([`Legality`]); every emitted move is then filtered against them so
//! the list never holds a move that leaves the mover's king attacked.

mod kings;
mod knights;
mod pawns;
mod sliders;

use super::attacks::AttackMap;
use super::geometry::GEOMETRY;
use super::pieces::PieceStore;
use super::types::{
    CastlingRights, Color, Direction, Move, MoveKind, MoveList, Piece, Square, SQUARE_COUNT,
};
use super::Position;

/// Set of squares keyed by padded index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SquareSet(u128);

impl SquareSet {
    pub(crate) const ALL: SquareSet = SquareSet(u128::MAX);

    #[inline]
    pub(crate) fn insert(&mut self, sq: Square) {
        self.0 |= 1 << sq.index();
    }

    #[inline]
    pub(crate) fn contains(self, sq: Square) -> bool {
        self.0 & (1 << sq.index()) != 0
    }
}

/// True when any piece of `by` attacks `sq` on the current board.
pub(crate) fn is_attacked(store: &PieceStore, attacks: &AttackMap, sq: Square, by: Color) -> bool {
    attacks
        .at(sq)
        .iter()
        .any(|(_, attacker)| store.color_at(attacker) == Some(by))
        || GEOMETRY
            .piece_mask(Piece::Knight, sq)
            .iter()
            .any(|s| store.is_piece(s, by, Piece::Knight))
        || GEOMETRY
            .pawn_captures(by.opponent(), sq)
            .iter()
            .any(|s| store.is_piece(s, by, Piece::Pawn))
        || GEOMETRY.distance(sq, store.king(by)) <= 1
}

/// Check and pin state of the side to move.
pub(crate) struct Legality {
    pub(crate) us: Color,
    pub(crate) king: Square,
    pub(crate) checkers: usize,
    /// Checker squares plus the empty squares between a checking slider
    /// and the king. Every square when not in check.
    pub(crate) targets: SquareSet,
    /// Squares directly behind the king on a checking slider's line.
    pub(crate) xray: SquareSet,
    pins: [Option<Direction>; SQUARE_COUNT],
}

impl Legality {
    pub(crate) fn new(store: &PieceStore, attacks: &AttackMap, us: Color) -> Self {
        let them = us.opponent();
        let king = store.king(us);
        let mut checkers = 0;
        let mut targets = SquareSet::default();
        let mut xray = SquareSet::default();

        for (dir, attacker) in attacks.at(king).iter() {
            if store.color_at(attacker) != Some(them) {
                continue;
            }
            checkers += 1;
            let mut t = Some(attacker);
            while let Some(sq) = t {
                if sq == king {
                    break;
                }
                targets.insert(sq);
                t = sq.offset(dir.delta());
            }
            if let Some(behind) = king.offset(dir.delta()) {
                xray.insert(behind);
            }
        }
        for sq in GEOMETRY.piece_mask(Piece::Knight, king) {
            if store.is_piece(sq, them, Piece::Knight) {
                checkers += 1;
                targets.insert(sq);
            }
        }
        for sq in GEOMETRY.pawn_captures(us, king) {
            if store.is_piece(sq, them, Piece::Pawn) {
                checkers += 1;
                targets.insert(sq);
            }
        }
        if checkers == 0 {
            targets = SquareSet::ALL;
        }

        let mut pins = [None; SQUARE_COUNT];
        for dir in Direction::ALL {
            let mut t = king.offset(dir.delta());
            while let Some(sq) = t {
                if store.is_empty(sq) {
                    t = sq.offset(dir.delta());
                    continue;
                }
                if store.color_at(sq) == Some(us) {
                    let pinner = attacks.at(sq).lane(dir.opposite());
                    if pinner.is_some_and(|p| store.color_at(p) == Some(them)) {
                        pins[sq.index()] = Some(dir);
                    }
                }
                break;
            }
        }

        Legality {
            us,
            king,
            checkers,
            targets,
            xray,
            pins,
        }
    }

    #[inline]
    pub(crate) fn pin(&self, sq: Square) -> Option<Direction> {
        self.pins[sq.index()]
    }

    /// A pinned piece may only move along its pin line.
    #[inline]
    pub(crate) fn pin_allows(&self, from: Square, to: Square) -> bool {
        match self.pins[from.index()] {
            None => true,
            Some(pin) => GEOMETRY.direction(from, to).is_some_and(|d| d.same_line(pin)),
        }
    }

    /// Non-king move filter: resolves any check and respects pins.
    #[inline]
    pub(crate) fn allows(&self, from: Square, to: Square) -> bool {
        self.targets.contains(to) && self.pin_allows(from, to)
    }
}

/// One generation pass writing into a ply's move list.
pub(crate) struct Generator<'a> {
    store: &'a PieceStore,
    attacks: &'a AttackMap,
    legality: Legality,
    castling: CastlingRights,
    en_passant: Option<Square>,
    list: &'a mut MoveList,
}

impl<'a> Generator<'a> {
    pub(crate) fn new(
        store: &'a PieceStore,
        attacks: &'a AttackMap,
        us: Color,
        castling: CastlingRights,
        en_passant: Option<Square>,
        list: &'a mut MoveList,
    ) -> Self {
        Generator {
            store,
            attacks,
            legality: Legality::new(store, attacks, us),
            castling,
            en_passant,
            list,
        }
    }

    pub(crate) fn run(mut self) {
        self.list.clear();
        if self.legality.checkers < 2 {
            self.pawn_moves();
            self.knight_moves();
            self.slider_moves();
        }
        self.king_moves();
        if self.legality.checkers == 0 {
            self.castling_moves();
        }
    }

    #[inline]
    fn us(&self) -> Color {
        self.legality.us
    }

    #[inline]
    fn push(
        &mut self,
        kind: MoveKind,
        from: Square,
        to: Square,
        captured: Option<Piece>,
        promotion: Option<Piece>,
    ) {
        self.list.push(Move::new(kind, from, to, captured, promotion));
    }

    /// Emit a step onto `to` unless a friendly piece stands there or the
    /// move is filtered out. Returns true when `to` was empty.
    fn step_onto(&mut self, kind: MoveKind, from: Square, to: Square) -> bool {
        let captured = match self.store.at(to) {
            Some(r) if r.color == self.us() => return false,
            Some(r) => Some(r.piece),
            None => None,
        };
        if self.legality.allows(from, to) {
            self.push(kind, from, to, captured, None);
        }
        captured.is_none()
    }
}

impl Position {
    /// Fill the current ply's list with every legal move and return it.
    /// Resets the ply's cursor.
    pub fn generate_moves(&mut self) -> &MoveList {
        let Position {
            store,
            attacks,
            nodes,
            ply,
            ..
        } = self;
        let node = &mut nodes[*ply];
        node.cursor = 0;
        Generator::new(
            store,
            attacks,
            node.side_to_move,
            node.castling,
            node.en_passant,
            &mut node.moves,
        )
        .run();
        &node.moves
    }

    /// Is the side to move in check?
    #[must_use]
    pub fn in_check(&self) -> bool {
        let us = self.side_to_move();
        is_attacked(&self.store, &self.attacks, self.store.king(us), us.opponent())
    }

    /// Number of pieces giving check to the side to move.
    #[must_use]
    pub fn checkers(&self) -> usize {
        Legality::new(&self.store, &self.attacks, self.side_to_move()).checkers
    }

    /// Legal moves of the current ply in a fresh list. The ply's own
    /// list and cursor are left alone, so this is safe inside a
    /// [`Position::next_move`] loop.
    #[must_use]
    pub fn legal_moves(&self) -> MoveList {
        let node = self.node();
        let mut list = MoveList::new();
        Generator::new(
            &self.store,
            &self.attacks,
            node.side_to_move,
            node.castling,
            node.en_passant,
            &mut list,
        )
        .run();
        list
    }

    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.in_check() && self.legal_moves().is_empty()
    }

    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        !self.in_check() && self.legal_moves().is_empty()
    }

    /// Can the side to move capture the opposing king? Only possible in
    /// a position reached by an illegal move.
    pub(crate) fn opponent_in_check(&self) -> bool {
        let them = self.side_to_move().opponent();
        is_attacked(&self.store, &self.attacks, self.store.king(them), them.opponent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_startpos_has_20_moves() {
        let mut position = Position::new();
        assert_eq!(position.generate_moves().len(), 20);
        assert!(!position.in_check());
    }

    #[test]
    fn test_pin_detection() {
        // White bishop on d2 pinned by the rook on d8 against the king on d1
        let position = Position::from_fen("3rk3/8/8/8/8/8/3B4/3K4 w - - 0 1");
        let legality = Legality::new(&position.store, &position.attacks, Color::White);
        assert_eq!(legality.pin(sq("d2")), Some(Direction::North));
        assert_eq!(legality.checkers, 0);
        assert!(!legality.pin_allows(sq("d2"), sq("e3")));
    }

    #[test]
    fn test_pinned_slider_moves_along_line() {
        let mut position = Position::from_fen("3rk3/8/8/8/8/8/3R4/3K4 w - - 0 1");
        let rook_moves: Vec<String> = position
            .generate_moves()
            .iter()
            .filter(|m| m.from() == sq("d2"))
            .map(|m| m.to_string())
            .collect();
        assert_eq!(rook_moves.len(), 6);
        assert!(rook_moves.contains(&"d2d8".to_string()));
        assert!(!rook_moves.contains(&"d2e2".to_string()));
    }

    #[test]
    fn test_check_targets_include_interpositions() {
        let position = Position::from_fen("4k3/8/8/8/8/8/8/r3K3 w - - 0 1");
        let legality = Legality::new(&position.store, &position.attacks, Color::White);
        assert_eq!(legality.checkers, 1);
        for s in ["a1", "b1", "c1", "d1"] {
            assert!(legality.targets.contains(sq(s)), "{s}");
        }
        assert!(!legality.targets.contains(sq("e1")));
        assert!(legality.xray.contains(sq("f1")));
    }

    #[test]
    fn test_king_cannot_retreat_along_check_line() {
        let mut position = Position::from_fen("4k3/8/8/8/8/8/8/r3K3 w - - 0 1");
        let moves = position.generate_moves();
        assert!(moves.iter().all(|m| m.to() != sq("f1")));
        assert!(moves.iter().any(|m| m.to() == sq("e2")));
    }

    #[test]
    fn test_checkmate_and_stalemate() {
        let mate = Position::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
        assert!(mate.is_checkmate());
        assert!(!mate.is_stalemate());

        let stale = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert!(stale.is_stalemate());
        assert!(!stale.is_checkmate());
    }

    #[test]
    fn test_queries_keep_the_ply_cursor() {
        let mut position = Position::new();
        let listed: Vec<Move> = position.generate_moves().iter().copied().collect();
        let first = position.next_move().unwrap();
        assert_eq!(first, listed[0]);

        assert!(!position.is_checkmate());
        assert!(!position.is_stalemate());
        position.parse_move("g1f3").unwrap();
        assert_eq!(position.legal_moves().len(), listed.len());

        assert_eq!(position.next_move(), Some(listed[1]));
        assert_eq!(position.moves().len(), listed.len());
    }
}
