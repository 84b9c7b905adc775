//! Leaf counting over legal play, the reference check for move
//! generation.

use crate::board::{Move, Position, MAX_PLY};
use crate::sync::StopFlag;

impl Position {
    /// Number of leaf positions `depth` plies below the current one.
    pub fn perft(&mut self, depth: usize) -> u64 {
        self.perft_with_stop(depth, &StopFlag::new())
    }

    /// Like [`Position::perft`], polling `stop` before every move. A
    /// cancelled walk returns the leaves counted so far and leaves the
    /// position where it started.
    pub fn perft_with_stop(&mut self, depth: usize, stop: &StopFlag) -> u64 {
        let depth = self.clamp_depth(depth);
        let nodes = self.count_leaves(depth, stop);
        if stop.is_stopped() {
            log::debug!("perft({depth}) cancelled after {nodes} leaves");
        }
        nodes
    }

    /// Leaf count below each root move, in coordinate-text order.
    pub fn perft_divide(&mut self, depth: usize) -> Vec<(Move, u64)> {
        self.perft_divide_with_stop(depth, &StopFlag::new())
    }

    /// Like [`Position::perft_divide`], polling `stop` before every move.
    /// A cancelled walk lists the root moves reached so far, the last one
    /// possibly with a partial count.
    pub fn perft_divide_with_stop(&mut self, depth: usize, stop: &StopFlag) -> Vec<(Move, u64)> {
        let depth = self.clamp_depth(depth);
        if depth == 0 {
            return Vec::new();
        }
        self.generate_moves();
        self.nodes[self.ply].moves.sort_lexical();

        let mut divide = Vec::with_capacity(self.moves().len());
        while let Some(mv) = self.next_move() {
            if stop.is_stopped() {
                log::debug!("perft divide({depth}) cancelled after {} root moves", divide.len());
                break;
            }
            self.apply(mv);
            let nodes = self.count_leaves(depth - 1, stop);
            self.reverse(mv);
            divide.push((mv, nodes));
        }
        divide
    }

    fn clamp_depth(&self, depth: usize) -> usize {
        let room = MAX_PLY - 1 - self.ply;
        if depth > room {
            log::warn!("perft depth {depth} exceeds the node stack, clamping to {room}");
            room
        } else {
            depth
        }
    }

    fn count_leaves(&mut self, depth: usize, stop: &StopFlag) -> u64 {
        if depth == 0 {
            return 1;
        }
        let count = self.generate_moves().len() as u64;
        if depth == 1 {
            return count;
        }

        let mut nodes = 0;
        while let Some(mv) = self.next_move() {
            if stop.is_stopped() {
                break;
            }
            self.apply(mv);
            nodes += self.count_leaves(depth - 1, stop);
            self.reverse(mv);
        }
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perft_shallow() {
        let mut position = Position::new();
        assert_eq!(position.perft(0), 1);
        assert_eq!(position.perft(1), 20);
        assert_eq!(position.perft(2), 400);
        assert_eq!(position.ply(), 0);
    }

    #[test]
    fn test_divide_sums_to_perft() {
        let mut position = Position::new();
        let divide = position.perft_divide(3);
        assert_eq!(divide.len(), 20);
        assert_eq!(divide.iter().map(|(_, n)| n).sum::<u64>(), 8902);
        assert_eq!(divide[0].0.to_string(), "a2a3");
        assert_eq!(divide[0].1, 380);
    }

    #[test]
    fn test_stopped_walk_returns_partial_count() {
        let mut position = Position::new();
        let before = position.snapshot();
        let count = position.perft_with_stop(4, &StopFlag::stopped());
        assert!(count < 197_281);
        assert_eq!(position.snapshot(), before);
    }

    #[test]
    fn test_stopped_divide_is_partial() {
        let mut position = Position::new();
        let before = position.snapshot();
        let divide = position.perft_divide_with_stop(4, &StopFlag::stopped());
        assert!(divide.len() < 20);
        assert!(divide.iter().map(|&(_, n)| n).sum::<u64>() < 197_281);
        assert_eq!(position.snapshot(), before);

        assert_eq!(position.perft_divide_with_stop(2, &StopFlag::new()).len(), 20);
    }

    #[test]
    fn test_depth_is_clamped_to_stack() {
        // a bare-kings walk deep enough to overflow the stack is clamped
        let mut position = Position::from_fen("8/8/8/8/8/8/8/K6k w - - 0 1");
        let before = position.snapshot();
        let _ = position.perft_with_stop(MAX_PLY + 10, &StopFlag::stopped());
        assert_eq!(position.snapshot(), before);
    }
}
