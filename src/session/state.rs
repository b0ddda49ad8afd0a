use rand::rngs::SmallRng;

use crate::problem::{Problem, ProblemSet};
use crate::session::board::{Board, DragData, DropTarget, Zone};

/// Saved arrangement and status of one problem.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProblemProgress {
    /// None until the problem is first opened.
    pub snapshot: Option<Board>,
    pub solved: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    NotQuite,
}

impl Feedback {
    pub fn message(self) -> &'static str {
        match self {
            Feedback::Correct => "\u{2705} Correct!",
            Feedback::NotQuite => "\u{274c} Not quite. Try again!",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavState {
    pub prev_enabled: bool,
    pub next_visible: bool,
    pub next_enabled: bool,
}

pub struct SessionState {
    problems: ProblemSet,
    current_index: usize,
    progress: Vec<ProblemProgress>,
    board: Board,
    drag: Option<DragData>,
    feedback: Option<Feedback>,
    /// Set by a failed check; cleared when another problem is opened.
    pub(crate) next_locked: bool,
    pub(crate) rng: SmallRng,
}

impl SessionState {
    pub fn with_rng(problems: ProblemSet, rng: SmallRng) -> Self {
        let progress = vec![ProblemProgress::default(); problems.len()];
        let mut state = Self {
            problems,
            current_index: 0,
            progress,
            board: Board::default(),
            drag: None,
            feedback: None,
            next_locked: false,
            rng,
        };
        state.open(0);
        state
    }

    pub fn problems(&self) -> &ProblemSet {
        &self.problems
    }

    pub fn has_problems(&self) -> bool {
        !self.problems.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_problem(&self) -> Option<&Problem> {
        self.problems.get(self.current_index)
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 == self.problems.len()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn progress(&self, index: usize) -> Option<&ProblemProgress> {
        self.progress.get(index)
    }

    pub(crate) fn progress_mut(&mut self) -> Option<&mut ProblemProgress> {
        self.progress.get_mut(self.current_index)
    }

    pub fn drag(&self) -> Option<DragData> {
        self.drag
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    pub(crate) fn set_feedback(&mut self, feedback: Feedback) {
        self.feedback = Some(feedback);
    }

    pub fn is_solved(&self, index: usize) -> bool {
        self.progress.get(index).is_some_and(|p| p.solved)
    }

    pub fn solved_count(&self) -> usize {
        self.progress.iter().filter(|p| p.solved).count()
    }

    /// True once every problem is solved. An empty set never completes.
    pub fn is_all_solved(&self) -> bool {
        !self.progress.is_empty() && self.progress.iter().all(|p| p.solved)
    }

    pub fn nav(&self) -> NavState {
        if !self.has_problems() {
            return NavState {
                prev_enabled: false,
                next_visible: false,
                next_enabled: false,
            };
        }
        let next_visible = !self.is_last();
        NavState {
            prev_enabled: self.current_index > 0,
            next_visible,
            next_enabled: next_visible && self.is_solved(self.current_index) && !self.next_locked,
        }
    }

    /// Make `index` the current problem, restoring its snapshot or dealing a
    /// fresh board on the first visit.
    fn open(&mut self, index: usize) {
        self.drag = None;
        self.feedback = None;
        self.next_locked = false;
        let Some(problem) = self.problems.get(index) else {
            self.board = Board::default();
            return;
        };
        self.current_index = index;
        let saved = self.progress[index].snapshot.clone();
        self.board = match saved {
            Some(saved) => saved,
            None => {
                let dealt = Board::deal(problem, &mut self.rng);
                self.progress[index].snapshot = Some(dealt.clone());
                dealt
            }
        };
        tracing::debug!(problem = index, "opened problem");
    }

    pub(crate) fn save_snapshot(&mut self) {
        let board = self.board.clone();
        if let Some(progress) = self.progress_mut() {
            progress.snapshot = Some(board);
        }
    }

    pub fn go_prev(&mut self) -> bool {
        if !self.nav().prev_enabled {
            return false;
        }
        self.open(self.current_index - 1);
        true
    }

    pub fn go_next(&mut self) -> bool {
        if !self.nav().next_enabled {
            return false;
        }
        self.open(self.current_index + 1);
        true
    }

    /// Pick up the block at `index` in `zone`.
    pub fn start_drag(&mut self, zone: Zone, index: usize) -> bool {
        if index >= self.board.zone(zone).len() {
            return false;
        }
        self.drag = Some(DragData { from: zone, index });
        true
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    /// Drop the dragged block. Without an active drag this does nothing.
    pub fn drop_on(&mut self, target: DropTarget) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        let moved = self.board.apply_drop(drag, target);
        self.save_snapshot();
        moved
    }

    /// Send a block straight to the end of the other column.
    pub fn send_to_other(&mut self, zone: Zone, index: usize) -> bool {
        if !self.start_drag(zone, index) {
            return false;
        }
        self.drop_on(DropTarget::End(zone.other()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Block;
    use rand::SeedableRng;

    fn problem(prompt: &str, blocks: &[&str], distractors: &[&str]) -> Problem {
        Problem {
            prompt: prompt.to_string(),
            blocks: blocks.iter().map(|t| Block::correct(t)).collect(),
            distractors: distractors.iter().map(|t| Block::distractor(t)).collect(),
        }
    }

    fn session() -> SessionState {
        let set = ProblemSet {
            problems: vec![
                problem("one", &["a", "b"], &["x"]),
                problem("two", &["c"], &[]),
            ],
        };
        SessionState::with_rng(set, SmallRng::seed_from_u64(1))
    }

    #[test]
    fn test_first_problem_dealt_on_start() {
        let s = session();
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.board().available.len(), 3);
        assert!(s.progress(0).unwrap().snapshot.is_some());
        assert!(s.progress(1).unwrap().snapshot.is_none());
    }

    #[test]
    fn test_nav_requires_solve_for_next() {
        let mut s = session();
        let nav = s.nav();
        assert!(!nav.prev_enabled);
        assert!(nav.next_visible);
        assert!(!nav.next_enabled);
        assert!(!s.go_next());
        assert!(!s.go_prev());
    }

    #[test]
    fn test_next_hidden_on_last_problem() {
        let mut s = session();
        s.progress[0].solved = true;
        assert!(s.go_next());
        let nav = s.nav();
        assert!(nav.prev_enabled);
        assert!(!nav.next_visible);
        assert!(!nav.next_enabled);
    }

    #[test]
    fn test_drop_without_drag_is_noop() {
        let mut s = session();
        let before = s.board().clone();
        assert!(!s.drop_on(DropTarget::End(Zone::Solution)));
        assert_eq!(s.board(), &before);
    }

    #[test]
    fn test_drag_cleared_after_drop() {
        let mut s = session();
        assert!(s.start_drag(Zone::Available, 0));
        assert!(s.drop_on(DropTarget::End(Zone::Solution)));
        assert!(s.drag().is_none());
        assert!(!s.drop_on(DropTarget::End(Zone::Solution)));
        assert_eq!(s.board().solution.len(), 1);
    }

    #[test]
    fn test_move_saves_snapshot() {
        let mut s = session();
        s.send_to_other(Zone::Available, 0);
        assert_eq!(s.progress(0).unwrap().snapshot.as_ref(), Some(s.board()));
    }

    #[test]
    fn test_empty_set_has_no_controls() {
        let s = SessionState::with_rng(ProblemSet::default(), SmallRng::seed_from_u64(1));
        assert!(!s.has_problems());
        assert!(s.current_problem().is_none());
        assert!(!s.is_all_solved());
        let nav = s.nav();
        assert!(!nav.prev_enabled && !nav.next_visible && !nav.next_enabled);
    }
}
