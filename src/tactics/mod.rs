//! Tactical analysis.
//!
//! Read-only questions about a board snapshot: who owns a square, which
//! pieces are threatened, defended or forked, which races to the far column
//! cannot be stopped. Every what-if is answered on a copied board, so the
//! board passed in is never modified.

pub mod fork;
pub mod opportunity;
pub mod query;
pub mod race;
pub mod threat;

pub use fork::{fork_severity, forked_squares, ForkSeverity};
pub use opportunity::{
    can_safely_capture, reachable_rescue_moves, scoring_moves, winning_moves,
};
pub use query::{is_opponent, is_own, is_tower, moves_owned_by, pieces_owned_by};
pub use race::{breakthrough_candidates, race_survivable};
pub use threat::{
    attackers_of, blocked_count, blocked_pieces, covered_by, defended_count, defended_pieces,
    defenders_of, delta_after_move, exposes_mover, is_attackable, is_defended, is_protected,
    is_threatened, protected_count, protected_pieces, protects, threatened_count,
    threatened_pieces, threatening_pieces,
};
