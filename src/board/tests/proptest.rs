//! Property-based tests using proptest.

use crate::board::{Move, Position};
use crate::tt::{Bound, TranspositionTable};
use proptest::prelude::*;

/// Strategy to generate a random legal move sequence length
fn move_count_strategy() -> impl Strategy<Value = usize> {
    1..=40usize
}

/// Strategy to generate a random seed for move selection
fn seed_strategy() -> impl Strategy<Value = u64> {
    any::<u64>()
}

/// Play `num_moves` random moves from the start position, stopping early
/// at mate or stalemate.
fn random_game(seed: u64, num_moves: usize) -> (Position, Vec<Move>) {
    use rand::prelude::*;

    let mut position = Position::new();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut played = Vec::new();
    for _ in 0..num_moves {
        let moves = position.generate_moves();
        if moves.is_empty() {
            break;
        }
        let mv = moves[rng.gen_range(0..moves.len())];
        position.apply(mv);
        played.push(mv);
    }
    (position, played)
}

proptest! {
    /// Property: apply followed by reverse restores every tracked field
    #[test]
    fn prop_apply_reverse_restores_state(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let before = Position::new().snapshot();
        let (mut position, played) = random_game(seed, num_moves);

        for mv in played.iter().rev() {
            position.reverse(*mv);
        }

        prop_assert_eq!(position.snapshot(), before);
        prop_assert_eq!(position.ply(), 0);
    }

    /// Property: incremental state always agrees with a rebuild
    #[test]
    fn prop_incremental_state_consistent(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let (position, _) = random_game(seed, num_moves);
        prop_assert_eq!(position.audit(), Ok(()));
    }

    /// Property: FEN round-trip preserves position
    #[test]
    fn prop_fen_roundtrip(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let (position, _) = random_game(seed, num_moves);

        let fen = position.to_fen();
        let restored = Position::try_from_fen(&fen);
        prop_assert!(restored.is_ok(), "{} rejected: {:?}", fen, restored);
        let restored = restored.unwrap();

        prop_assert_eq!(position.key(), restored.key());
        prop_assert_eq!(position.side_to_move(), restored.side_to_move());
        prop_assert_eq!(position.castling_rights(), restored.castling_rights());
        prop_assert_eq!(position.en_passant(), restored.en_passant());
        prop_assert_eq!(restored.to_fen(), fen);
    }

    /// Property: a position reached by play and the same position set up
    /// from its FEN generate the same moves
    #[test]
    fn prop_fen_setup_generates_same_moves(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let (mut position, _) = random_game(seed, num_moves);
        let mut restored = Position::from_fen(&position.to_fen());

        let mut played: Vec<String> = position.generate_moves().iter().map(|m| m.to_string()).collect();
        let mut setup: Vec<String> = restored.generate_moves().iter().map(|m| m.to_string()).collect();
        played.sort();
        setup.sort();
        prop_assert_eq!(played, setup);
    }

    /// Property: every generated move keeps the mover's king safe
    #[test]
    fn prop_legal_moves_are_legal(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let (mut position, _) = random_game(seed, num_moves);
        let moves: Vec<Move> = position.generate_moves().iter().copied().collect();
        for mv in moves {
            position.apply(mv);
            prop_assert!(!position.opponent_in_check(), "{} leaves the king attacked", mv);
            position.reverse(mv);
        }
    }

    /// Property: packed moves survive the table
    #[test]
    fn prop_tt_round_trips_moves(seed in seed_strategy(), num_moves in move_count_strategy(), score in -20000i32..20000) {
        let (mut position, _) = random_game(seed, num_moves);
        let mut tt = TranspositionTable::with_budget(1 << 12);
        let moves: Vec<Move> = position.generate_moves().iter().copied().collect();
        if let Some(&mv) = moves.last() {
            let key = position.key();
            tt.store(key, mv.bits(), 3, Bound::Exact, score, position.ply(), 0);
            let entry = *tt.get(key);
            prop_assert!(entry.matches(key));
            prop_assert_eq!(position.moves().find_bits(entry.best_move_bits()), Some(mv));
            prop_assert_eq!(entry.score(position.ply()), score);
        }
    }
}
