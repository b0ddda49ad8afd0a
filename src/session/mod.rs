pub mod board;
pub mod certificate;
pub mod evaluator;
pub mod state;
