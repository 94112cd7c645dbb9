pub mod evaluator;

pub use evaluator::{MatchPoints, evaluate_match};
