use crate::problem::{Block, Problem};
use crate::session::board::Board;
use crate::session::state::{Feedback, SessionState};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckOutcome {
    Solved { all_solved: bool },
    NotQuite { removed: Option<Block> },
    /// Nothing to check: the problem set is empty.
    NoProblem,
}

/// In-order text comparison against the canonical solution.
pub fn matches_solution(board: &Board, problem: &Problem) -> bool {
    board.solution.len() == problem.blocks.len()
        && board.solution_texts().eq(problem.solution_texts())
}

impl SessionState {
    /// Evaluate the current arrangement. A wrong answer takes one distractor
    /// off the board, if any are left.
    pub fn check_solution(&mut self) -> CheckOutcome {
        let index = self.current_index();
        let Some(problem) = self.current_problem() else {
            return CheckOutcome::NoProblem;
        };

        if matches_solution(self.board(), problem) {
            if let Some(progress) = self.progress_mut() {
                progress.solved = true;
            }
            self.next_locked = false;
            self.set_feedback(Feedback::Correct);
            let all_solved = self.is_all_solved();
            tracing::info!(problem = index, all_solved, "solution accepted");
            return CheckOutcome::Solved { all_solved };
        }

        self.next_locked = true;
        self.set_feedback(Feedback::NotQuite);
        let removed = self.board_mut().remove_first_distractor();
        if removed.is_some() {
            self.save_snapshot();
        }
        tracing::info!(
            problem = index,
            removed = removed.as_ref().map(|b| b.text.as_str()),
            remaining = self.board().live_distractors(),
            "solution rejected"
        );
        CheckOutcome::NotQuite { removed }
    }
}
