use super::attacks::AttackMap;
use super::pieces::PieceStore;
use super::types::{CastlingRights, Color, MoveList, Piece, Square, MAX_PLY};
use crate::zobrist::{material_keys, position_key};

/// Per-ply state. Node `i + 1` is the child of node `i`; the stack is
/// allocated once and reused for the life of the position.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) pawn_key: u64,
    pub(crate) piece_key: u64,
    pub(crate) key: u64,
    pub(crate) moves: MoveList,
    pub(crate) cursor: usize,
}

impl Node {
    fn new() -> Self {
        Node {
            side_to_move: Color::White,
            castling: CastlingRights::none(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            pawn_key: 0,
            piece_key: 0,
            key: 0,
            moves: MoveList::new(),
            cursor: 0,
        }
    }

    #[inline]
    pub(crate) fn refresh_key(&mut self) {
        self.key = position_key(
            self.pawn_key,
            self.piece_key,
            self.side_to_move,
            self.castling,
            self.en_passant,
        );
    }
}

/// A chess position with its incremental bookkeeping: piece store and
/// board, slider attack map, material, and a fixed-depth node stack.
#[derive(Clone, Debug)]
pub struct Position {
    pub(crate) store: PieceStore,
    pub(crate) attacks: AttackMap,
    pub(crate) material: [i32; 2],
    pub(crate) nodes: Vec<Node>,
    pub(crate) ply: usize,
}

impl Position {
    /// The standard starting position.
    #[must_use]
    pub fn new() -> Self {
        let mut position = Position::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, piece) in back_rank.into_iter().enumerate() {
            for (color, rank, pawn_rank) in [(Color::White, 0, 1), (Color::Black, 7, 6)] {
                let home = Square::from_raw((rank << 4 | file) as u8);
                let pawn = Square::from_raw((pawn_rank << 4 | file) as u8);
                position.store.add(color, piece, home);
                position.store.add(color, Piece::Pawn, pawn);
            }
        }

        let root = &mut position.nodes[0];
        root.castling = CastlingRights::all();
        position.finish_setup();
        position
    }

    pub(crate) fn empty() -> Self {
        Position {
            store: PieceStore::new(),
            attacks: AttackMap::new(),
            material: [0, 0],
            nodes: vec![Node::new(); MAX_PLY],
            ply: 0,
        }
    }

    /// Derive every incremental field of the root from the placed pieces
    /// and root state.
    pub(crate) fn finish_setup(&mut self) {
        self.ply = 0;
        self.attacks = AttackMap::rebuild(&self.store);
        self.material = self.recount_material();
        let (pawn_key, piece_key) = self.recompute_placement_keys();
        let root = &mut self.nodes[0];
        root.pawn_key = pawn_key;
        root.piece_key = piece_key;
        root.refresh_key();
        root.moves.clear();
        root.cursor = 0;
    }

    pub(crate) fn recount_material(&self) -> [i32; 2] {
        let mut material = [0, 0];
        for record in self.store.iter() {
            material[record.color.index()] += record.piece.value();
        }
        material
    }

    pub(crate) fn recompute_placement_keys(&self) -> (u64, u64) {
        material_keys(self.store.iter().map(|r| (r.color, r.piece, r.square)))
    }

    #[inline]
    pub(crate) fn node(&self) -> &Node {
        &self.nodes[self.ply]
    }

    /// Position key of the current ply.
    #[inline]
    #[must_use]
    pub fn key(&self) -> u64 {
        self.node().key
    }

    #[inline]
    #[must_use]
    pub fn pawn_key(&self) -> u64 {
        self.node().pawn_key
    }

    #[inline]
    #[must_use]
    pub fn piece_key(&self) -> u64 {
        self.node().piece_key
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.node().side_to_move
    }

    #[inline]
    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.node().castling
    }

    #[inline]
    #[must_use]
    pub fn en_passant(&self) -> Option<Square> {
        self.node().en_passant
    }

    #[inline]
    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.node().halfmove_clock
    }

    #[inline]
    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.node().fullmove_number
    }

    /// Plies applied since the root.
    #[inline]
    #[must_use]
    pub fn ply(&self) -> usize {
        self.ply
    }

    /// Sum of piece values for one side (kings excluded).
    #[inline]
    #[must_use]
    pub fn material(&self, color: Color) -> i32 {
        self.material[color.index()]
    }

    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.store.at(sq).map(|r| (r.color, r.piece))
    }

    #[must_use]
    pub fn king_square(&self, color: Color) -> Square {
        self.store.king(color)
    }

    /// Squares of every piece of one (color, kind).
    #[must_use]
    pub fn squares_of(&self, color: Color, piece: Piece) -> Vec<Square> {
        self.store.range(color, piece).iter().map(|r| r.square).collect()
    }

    /// Moves generated for the current ply.
    #[must_use]
    pub fn moves(&self) -> &MoveList {
        &self.node().moves
    }

    /// Next move of the current ply's list, advancing its cursor.
    pub fn next_move(&mut self) -> Option<super::Move> {
        let node = &mut self.nodes[self.ply];
        let mv = node.moves.as_slice().get(node.cursor).copied();
        if mv.is_some() {
            node.cursor += 1;
        }
        mv
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}
