use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use parsons::problem::loader::load_problem_set;
use parsons::problem::{Block, Problem, ProblemSet};
use parsons::session::board::{Board, DropTarget, Zone};
use parsons::session::evaluator::{CheckOutcome, matches_solution};
use parsons::session::state::SessionState;

fn problem(prompt: &str, blocks: &[&str], distractors: &[&str]) -> Problem {
    Problem {
        prompt: prompt.to_string(),
        blocks: blocks.iter().map(|t| Block::correct(t)).collect(),
        distractors: distractors.iter().map(|t| Block::distractor(t)).collect(),
    }
}

fn two_problem_set() -> ProblemSet {
    ProblemSet {
        problems: vec![
            problem(
                "Print 0 to 4",
                &["for i in range(5):", "    print(i)"],
                &["for i in range(4):", "    print(i + 1)", "while i < 5:"],
            ),
            problem("Return the answer", &["def answer():", "    return 42"], &[]),
        ],
    }
}

fn sorted_texts<'a>(blocks: impl Iterator<Item = &'a Block>) -> Vec<String> {
    let mut texts: Vec<String> = blocks.map(|b| b.text.clone()).collect();
    texts.sort();
    texts
}

/// Blocks on the board must always be the canonical blocks plus whatever is
/// left in the distractor pool.
fn assert_conserved(board: &Board, problem: &Problem) {
    let on_board = sorted_texts(board.available.iter().chain(board.solution.iter()));
    let expected = sorted_texts(problem.blocks.iter().chain(board.distractors_pool.iter()));
    assert_eq!(on_board, expected);
}

fn place_in_order(session: &mut SessionState, texts: &[&str]) {
    for text in texts {
        let idx = session
            .board()
            .available
            .iter()
            .position(|b| b.text == *text)
            .unwrap_or_else(|| panic!("{text} not available"));
        assert!(session.send_to_other(Zone::Available, idx));
    }
}

#[test]
fn random_drags_conserve_blocks() {
    let mut session = SessionState::with_rng(two_problem_set(), SmallRng::seed_from_u64(7));
    let mut rng = SmallRng::seed_from_u64(99);
    let problem = session.current_problem().unwrap().clone();

    for step in 0..500 {
        let from = if rng.gen_bool(0.5) {
            Zone::Available
        } else {
            Zone::Solution
        };
        let from_len = session.board().zone(from).len();
        if from_len == 0 {
            continue;
        }
        session.start_drag(from, rng.gen_range(0..from_len));

        let to = if rng.gen_bool(0.5) {
            Zone::Available
        } else {
            Zone::Solution
        };
        let to_len = session.board().zone(to).len();
        let target = if to_len == 0 || rng.gen_bool(0.3) {
            DropTarget::End(to)
        } else {
            DropTarget::Block {
                zone: to,
                index: rng.gen_range(0..to_len),
            }
        };
        session.drop_on(target);
        assert!(session.drag().is_none(), "drag survives drop at step {step}");
        assert_conserved(session.board(), &problem);

        if step % 50 == 0 {
            session.check_solution();
            assert_conserved(session.board(), &problem);
        }
    }
}

#[test]
fn drop_without_drag_changes_nothing() {
    let mut session = SessionState::with_rng(two_problem_set(), SmallRng::seed_from_u64(1));
    let before = session.board().clone();
    assert!(!session.drop_on(DropTarget::End(Zone::Solution)));
    assert_eq!(session.board(), &before);
}

#[test]
fn available_to_available_is_ignored() {
    let mut session = SessionState::with_rng(two_problem_set(), SmallRng::seed_from_u64(2));
    let before = session.board().clone();
    session.start_drag(Zone::Available, 0);
    assert!(!session.drop_on(DropTarget::Block {
        zone: Zone::Available,
        index: 3,
    }));
    assert_eq!(session.board(), &before);
    assert!(session.drag().is_none());
}

#[test]
fn solution_background_drop_keeps_order() {
    let mut session = SessionState::with_rng(two_problem_set(), SmallRng::seed_from_u64(12));
    place_in_order(&mut session, &["for i in range(5):", "    print(i)"]);
    let before = session.board().clone();

    assert!(session.start_drag(Zone::Solution, 0));
    assert!(!session.drop_on(DropTarget::End(Zone::Solution)));
    assert!(session.drag().is_none());
    assert_eq!(session.board(), &before);
}

#[test]
fn solved_exactly_when_text_order_matches() {
    let mut session = SessionState::with_rng(two_problem_set(), SmallRng::seed_from_u64(3));
    place_in_order(&mut session, &["    print(i)", "for i in range(5):"]);
    let problem = session.current_problem().unwrap().clone();
    assert!(!matches_solution(session.board(), &problem));
    assert!(matches!(
        session.check_solution(),
        CheckOutcome::NotQuite { removed: Some(_) }
    ));
    assert!(!session.is_solved(0));

    // Reorder: drop the print line onto the slot after the loop header
    session.start_drag(Zone::Solution, 0);
    assert!(session.drop_on(DropTarget::Block {
        zone: Zone::Solution,
        index: 1,
    }));
    assert!(matches_solution(session.board(), &problem));
    assert_eq!(
        session.check_solution(),
        CheckOutcome::Solved { all_solved: false }
    );
    assert!(session.is_solved(0));
}

#[test]
fn extra_block_in_solution_is_not_solved() {
    let mut session = SessionState::with_rng(two_problem_set(), SmallRng::seed_from_u64(4));
    place_in_order(&mut session, &["for i in range(5):", "    print(i)", "while i < 5:"]);
    let outcome = session.check_solution();
    assert!(matches!(outcome, CheckOutcome::NotQuite { .. }));
    assert!(!session.is_solved(0));
}

#[test]
fn failed_checks_remove_one_distractor_each() {
    let mut session = SessionState::with_rng(two_problem_set(), SmallRng::seed_from_u64(5));
    let mut live = session.board().live_distractors();
    let mut pool = session.board().distractors_pool.len();
    assert_eq!(live, 3);

    for _ in 0..5 {
        session.check_solution();
        let now_live = session.board().live_distractors();
        let now_pool = session.board().distractors_pool.len();
        assert_eq!(now_live, live.saturating_sub(1));
        assert_eq!(now_pool, pool.saturating_sub(1));
        live = now_live;
        pool = now_pool;
    }
    assert_eq!(live, 0);
    assert_eq!(
        session.check_solution(),
        CheckOutcome::NotQuite { removed: None }
    );
}

#[test]
fn navigation_restores_snapshot_exactly() {
    let mut session = SessionState::with_rng(two_problem_set(), SmallRng::seed_from_u64(6));
    place_in_order(&mut session, &["for i in range(5):", "    print(i)"]);
    session.check_solution();
    let first = session.board().clone();

    assert!(session.go_next());
    session.send_to_other(Zone::Available, 0);
    let second = session.board().clone();

    assert!(session.go_prev());
    assert_eq!(session.board(), &first);
    assert!(session.feedback().is_none());

    assert!(session.go_next());
    assert_eq!(session.board(), &second);
}

#[test]
fn next_is_gated_on_solving() {
    let mut session = SessionState::with_rng(two_problem_set(), SmallRng::seed_from_u64(8));
    assert!(!session.go_next());
    assert!(!session.nav().prev_enabled);

    place_in_order(&mut session, &["for i in range(5):", "    print(i)"]);
    session.check_solution();
    assert!(session.go_next());
    let nav = session.nav();
    assert!(nav.prev_enabled);
    assert!(!nav.next_visible);
}

#[test]
fn last_solve_completes_the_set() {
    let mut session = SessionState::with_rng(two_problem_set(), SmallRng::seed_from_u64(9));
    place_in_order(&mut session, &["for i in range(5):", "    print(i)"]);
    session.check_solution();
    session.go_next();
    assert!(!session.is_all_solved());
    place_in_order(&mut session, &["def answer():", "    return 42"]);
    assert_eq!(
        session.check_solution(),
        CheckOutcome::Solved { all_solved: true }
    );
    assert!(session.is_all_solved());
}

#[test]
fn empty_set_never_completes() {
    let mut session = SessionState::with_rng(ProblemSet::default(), SmallRng::seed_from_u64(0));
    assert!(!session.has_problems());
    assert!(!session.is_all_solved());
    assert_eq!(session.check_solution(), CheckOutcome::NoProblem);
    assert!(!session.go_next());
    assert!(!session.go_prev());
}

#[test]
fn bundled_problem_set_is_playable() {
    let set = load_problem_set("batch1.json", Duration::from_secs(1)).unwrap();
    assert!(!set.is_empty());
    for problem in &set.problems {
        assert!(!problem.prompt.is_empty());
        assert!(!problem.blocks.is_empty());
        assert!(problem.blocks.iter().all(|b| b.correct));
        assert!(problem.distractors.iter().all(|b| !b.correct));
    }
}
