//! Heuristic move scoring.
//!
//! A move's score is the intrinsic value of the piece it moves, plus the
//! growth of the opponent's threatened pieces, minus the growth of our own.
//! A move that leaves the opponent a winning reply is floored to
//! [`DISQUALIFIED`] so it loses to every other candidate.

use thiserror::Error;

use crate::board::{Board, Move, PieceKind, Square};
use crate::rules::Position;
use crate::tactics::{delta_after_move, protects, threatened_count, winning_moves};

/// Score of a move that hands the opponent a winning reply.
pub const DISQUALIFIED: i32 = i32::MIN;

/// Errors raised by the move scorer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("no candidate moves to choose from")]
    NoCandidates,
}

/// A candidate move with its heuristic score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

/// How costly losing the piece on `sq` would be.
///
/// Base value by kind, plus distance from its home column (seals move the
/// same anywhere, so distance does not count for them), plus the number of
/// friendly squares it covers. Zero for an empty square.
pub fn intrinsic_value(board: &Board, sq: Square) -> i32 {
    let Some(piece) = board.get(sq) else {
        return 0;
    };
    let distance = match piece.kind {
        PieceKind::Seal => 0,
        _ => piece.team.distance_from_home(sq.x) as i32,
    };
    piece.kind.base_value() + distance + protects(board, sq).len() as i32
}

/// Scores a single move for the team that owns its moving piece.
pub fn score_move(pos: &Position, mv: Move) -> i32 {
    let me = pos
        .board
        .get(mv.from)
        .map(|p| p.team)
        .unwrap_or_else(|| pos.current_team());
    let opp = me.opponent();

    if !winning_moves(&pos.simulate(mv), opp).is_empty() {
        return DISQUALIFIED;
    }

    let opp_delta = delta_after_move(&pos.board, mv, |b| threatened_count(b, opp));
    let own_delta = delta_after_move(&pos.board, mv, |b| threatened_count(b, me));
    intrinsic_value(&pos.board, mv.from) + opp_delta - own_delta
}

/// Scores every candidate, preserving order.
pub fn score_candidates(pos: &Position, candidates: &[Move]) -> Vec<ScoredMove> {
    candidates
        .iter()
        .map(|&mv| ScoredMove {
            mv,
            score: score_move(pos, mv),
        })
        .collect()
}

/// Returns the candidate with the strictly greatest score; the first one
/// seen wins ties.
pub fn pick_best(pos: &Position, candidates: &[Move]) -> Result<Move, ScoreError> {
    let mut scored = score_candidates(pos, candidates).into_iter();
    let mut best = scored.next().ok_or(ScoreError::NoCandidates)?;
    for s in scored {
        if s.score > best.score {
            best = s;
        }
    }
    Ok(best.mv)
}
