use rand::Rng;
use rand::seq::SliceRandom;

use crate::problem::{Block, Problem};

/// One of the two columns a block can live in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Zone {
    Available,
    Solution,
}

impl Zone {
    pub fn other(self) -> Self {
        match self {
            Zone::Available => Zone::Solution,
            Zone::Solution => Zone::Available,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Zone::Available => "Available blocks",
            Zone::Solution => "Your solution",
        }
    }
}

/// The block currently being dragged. Valid only until the next drop or cancel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragData {
    pub from: Zone,
    pub index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropTarget {
    /// Dropped onto another block: insert at that block's index.
    Block { zone: Zone, index: usize },
    /// Dropped onto the column background: append.
    End(Zone),
}

impl DropTarget {
    pub fn zone(self) -> Zone {
        match self {
            DropTarget::Block { zone, .. } | DropTarget::End(zone) => zone,
        }
    }
}

/// The three sequences that make up one problem's arrangement.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    pub available: Vec<Block>,
    pub solution: Vec<Block>,
    pub distractors_pool: Vec<Block>,
}

impl Board {
    /// Fresh arrangement: every block and distractor shuffled into the
    /// available column, nothing placed yet.
    pub fn deal<R: Rng>(problem: &Problem, rng: &mut R) -> Self {
        let distractors_pool = problem.distractors.clone();
        let mut available: Vec<Block> = problem
            .blocks
            .iter()
            .chain(distractors_pool.iter())
            .cloned()
            .collect();
        available.shuffle(rng);
        Self {
            available,
            solution: Vec::new(),
            distractors_pool,
        }
    }

    pub fn zone(&self, zone: Zone) -> &[Block] {
        match zone {
            Zone::Available => &self.available,
            Zone::Solution => &self.solution,
        }
    }

    fn zone_mut(&mut self, zone: Zone) -> &mut Vec<Block> {
        match zone {
            Zone::Available => &mut self.available,
            Zone::Solution => &mut self.solution,
        }
    }

    /// Move the dragged block to `target`. Returns false when the move is not
    /// one of the supported drags: available to available, a solution block
    /// dropped on its own column's background, or a stale index.
    pub fn apply_drop(&mut self, drag: DragData, target: DropTarget) -> bool {
        let to = target.zone();
        if drag.from == Zone::Available && to == Zone::Available {
            return false;
        }
        // Reordering inside the solution needs a block to drop onto.
        if drag.from == Zone::Solution && target == DropTarget::End(Zone::Solution) {
            return false;
        }
        if drag.index >= self.zone(drag.from).len() {
            return false;
        }

        let block = self.zone_mut(drag.from).remove(drag.index);
        let dest = self.zone_mut(to);
        match target {
            DropTarget::Block { index, .. } => {
                let index = index.min(dest.len());
                dest.insert(index, block);
            }
            DropTarget::End(_) => dest.push(block),
        }
        true
    }

    /// Distractors still on the board, in either column.
    pub fn live_distractors(&self) -> usize {
        self.available
            .iter()
            .chain(self.solution.iter())
            .filter(|b| !b.correct)
            .count()
    }

    /// Take one distractor off the board: the first one in the available
    /// column, otherwise the first one in the solution. The first pool entry
    /// with the same text goes with it.
    pub fn remove_first_distractor(&mut self) -> Option<Block> {
        let removed = [Zone::Available, Zone::Solution].into_iter().find_map(|zone| {
            let blocks = self.zone_mut(zone);
            let idx = blocks.iter().position(|b| !b.correct)?;
            Some(blocks.remove(idx))
        })?;

        if let Some(pool_idx) = self
            .distractors_pool
            .iter()
            .position(|b| b.text == removed.text)
        {
            self.distractors_pool.remove(pool_idx);
        }
        Some(removed)
    }

    pub fn solution_texts(&self) -> impl Iterator<Item = &str> {
        self.solution.iter().map(|b| b.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn texts(blocks: &[Block]) -> Vec<&str> {
        blocks.iter().map(|b| b.text.as_str()).collect()
    }

    fn board(available: &[&str], solution: &[&str]) -> Board {
        Board {
            available: available.iter().map(|t| Block::correct(t)).collect(),
            solution: solution.iter().map(|t| Block::correct(t)).collect(),
            distractors_pool: Vec::new(),
        }
    }

    #[test]
    fn test_deal_puts_everything_in_available() {
        let problem = Problem {
            prompt: "p".to_string(),
            blocks: vec![Block::correct("a"), Block::correct("b")],
            distractors: vec![Block::distractor("x")],
        };
        let mut rng = SmallRng::seed_from_u64(7);
        let board = Board::deal(&problem, &mut rng);
        let mut dealt = texts(&board.available);
        dealt.sort();
        assert_eq!(dealt, vec!["a", "b", "x"]);
        assert!(board.solution.is_empty());
        assert_eq!(texts(&board.distractors_pool), vec!["x"]);
    }

    #[test]
    fn test_available_to_solution_at_position() {
        let mut b = board(&["a", "b"], &["x", "y"]);
        let moved = b.apply_drop(
            DragData { from: Zone::Available, index: 1 },
            DropTarget::Block { zone: Zone::Solution, index: 1 },
        );
        assert!(moved);
        assert_eq!(texts(&b.available), vec!["a"]);
        assert_eq!(texts(&b.solution), vec!["x", "b", "y"]);
    }

    #[test]
    fn test_available_to_solution_end() {
        let mut b = board(&["a", "b"], &["x"]);
        b.apply_drop(
            DragData { from: Zone::Available, index: 0 },
            DropTarget::End(Zone::Solution),
        );
        assert_eq!(texts(&b.solution), vec!["x", "a"]);
    }

    #[test]
    fn test_reorder_within_solution_uses_pre_removal_index() {
        let mut b = board(&[], &["a", "b", "c"]);
        b.apply_drop(
            DragData { from: Zone::Solution, index: 0 },
            DropTarget::Block { zone: Zone::Solution, index: 2 },
        );
        assert_eq!(texts(&b.solution), vec!["b", "c", "a"]);

        b.apply_drop(
            DragData { from: Zone::Solution, index: 2 },
            DropTarget::Block { zone: Zone::Solution, index: 0 },
        );
        assert_eq!(texts(&b.solution), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_solution_back_to_available() {
        let mut b = board(&["a"], &["x", "y"]);
        b.apply_drop(
            DragData { from: Zone::Solution, index: 1 },
            DropTarget::Block { zone: Zone::Available, index: 0 },
        );
        assert_eq!(texts(&b.available), vec!["y", "a"]);
        b.apply_drop(
            DragData { from: Zone::Solution, index: 0 },
            DropTarget::End(Zone::Available),
        );
        assert_eq!(texts(&b.available), vec!["y", "a", "x"]);
        assert!(b.solution.is_empty());
    }

    #[test]
    fn test_available_to_available_is_ignored() {
        let mut b = board(&["a", "b"], &[]);
        let moved = b.apply_drop(
            DragData { from: Zone::Available, index: 0 },
            DropTarget::Block { zone: Zone::Available, index: 1 },
        );
        assert!(!moved);
        assert_eq!(texts(&b.available), vec!["a", "b"]);
    }

    #[test]
    fn test_solution_block_on_own_end_slot_is_ignored() {
        let mut b = board(&[], &["a", "b", "c"]);
        let moved = b.apply_drop(
            DragData { from: Zone::Solution, index: 0 },
            DropTarget::End(Zone::Solution),
        );
        assert!(!moved);
        assert_eq!(texts(&b.solution), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_stale_index_is_ignored() {
        let mut b = board(&["a"], &[]);
        let moved = b.apply_drop(
            DragData { from: Zone::Available, index: 3 },
            DropTarget::End(Zone::Solution),
        );
        assert!(!moved);
        assert_eq!(texts(&b.available), vec!["a"]);
    }

    #[test]
    fn test_remove_prefers_available_column() {
        let mut b = Board {
            available: vec![Block::correct("a"), Block::distractor("x")],
            solution: vec![Block::distractor("y")],
            distractors_pool: vec![Block::distractor("y"), Block::distractor("x")],
        };
        let removed = b.remove_first_distractor().unwrap();
        assert_eq!(removed.text, "x");
        assert_eq!(texts(&b.available), vec!["a"]);
        assert_eq!(texts(&b.distractors_pool), vec!["y"]);

        let removed = b.remove_first_distractor().unwrap();
        assert_eq!(removed.text, "y");
        assert!(b.solution.is_empty());
        assert!(b.distractors_pool.is_empty());
        assert!(b.remove_first_distractor().is_none());
    }

    #[test]
    fn test_duplicate_text_removes_first_pool_match() {
        let mut b = Board {
            available: vec![Block::distractor("dup")],
            solution: vec![Block::distractor("dup")],
            distractors_pool: vec![Block::distractor("dup"), Block::distractor("dup")],
        };
        b.remove_first_distractor();
        assert_eq!(b.live_distractors(), 1);
        assert_eq!(b.distractors_pool.len(), 1);
    }
}
