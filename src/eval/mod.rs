//! Move evaluation.
//!
//! Scores candidate moves by how much the moving piece is worth and how the
//! move shifts the balance of threatened pieces, and picks the best one.
//! An optional weighted sampler draws among scored candidates for variety.

pub(crate) mod heuristic;
pub mod sampling;

pub use heuristic::{
    intrinsic_value, pick_best, score_candidates, score_move, ScoreError, ScoredMove, DISQUALIFIED,
};
pub use sampling::WeightedSampler;
