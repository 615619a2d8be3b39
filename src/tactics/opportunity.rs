//! Move sets the decision pipeline acts on: safe captures, scoring moves,
//! outright wins, and rescues of threatened pieces.

use crate::board::{Board, Move, Team};
use crate::movegen;
use crate::rules::{Position, WIN_SCORE};

use super::query::is_opponent;
use super::threat::{delta_after_move, is_threatened, threatened_count, threatened_pieces};

/// Captures of threatened opposing pieces that do not raise the number of
/// `team`'s own threatened pieces.
pub fn can_safely_capture(board: &Board, team: Team) -> Vec<Move> {
    let victim = team.opponent();
    movegen::legal_moves(board, team)
        .into_iter()
        .filter(|mv| is_opponent(board, mv.to, team) && is_threatened(board, mv.to, victim))
        .filter(|&mv| delta_after_move(board, mv, |b| threatened_count(b, team)) <= 0)
        .collect()
}

/// Moves of `team` that earn at least one amber.
pub fn scoring_moves(pos: &Position, team: Team) -> Vec<Move> {
    let before = pos.score_for(team);
    pos.legal_moves(team)
        .into_iter()
        .filter(|&mv| pos.simulate(mv).score_for(team) > before)
        .collect()
}

/// Scoring moves that bring `team` to the winning score.
pub fn winning_moves(pos: &Position, team: Team) -> Vec<Move> {
    pos.legal_moves(team)
        .into_iter()
        .filter(|&mv| pos.simulate(mv).score_for(team) >= WIN_SCORE.max(pos.score_for(team) + 1))
        .collect()
}

/// Moves of currently threatened pieces after which no piece of `team` is
/// threatened at all.
pub fn reachable_rescue_moves(board: &Board, team: Team) -> Vec<Move> {
    let mut rescues = Vec::new();
    for sq in threatened_pieces(board, team) {
        for mv in movegen::moves_from(board, sq) {
            if threatened_count(&board.after(mv), team) == 0 {
                rescues.push(mv);
            }
        }
    }
    rescues
}
