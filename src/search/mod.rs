//! Move selection.
//!
//! A fixed-priority pipeline of tactical stages picks one move per turn.
//! Each stage either commits to a move or defers to the next; a fault in
//! any stage is contained and answered with a best-effort recovery move.

pub mod pipeline;

pub use pipeline::{Decision, DecisionError, Fault, Pipeline, Stage};
