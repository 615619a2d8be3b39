//! Fork (double threat) detection.

use crate::board::{Board, Move, Square};
use crate::movegen;

use super::threat::{is_threatened, threatened_pieces};

/// How hard a fork is to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ForkSeverity {
    None,
    /// Two or more new threats, but one reply answers all of them.
    Mitigable,
    /// Two or more new threats and no single reply answers them all.
    Decisive,
}

/// Opposing pieces threatened after `mv` that were not threatened before.
pub fn forked_squares(board: &Board, mv: Move) -> Vec<Square> {
    let Some(mover) = board.get(mv.from) else {
        return Vec::new();
    };
    let victim = mover.team.opponent();
    let before = threatened_pieces(board, victim);
    let after = board.after(mv);
    threatened_pieces(&after, victim)
        .into_iter()
        .filter(|sq| !before.contains(sq))
        .collect()
}

/// Classifies `mv` as a fork.
///
/// The moved piece must not be threatened on its landing square and at
/// least two opposing pieces must become threatened. The fork is decisive
/// when no single opposing reply leaves all of them safe. A forked piece
/// that replies is followed to its new square, and the replying piece must
/// not end up threatened itself.
pub fn fork_severity(board: &Board, mv: Move) -> ForkSeverity {
    let Some(mover) = board.get(mv.from) else {
        return ForkSeverity::None;
    };
    let team = mover.team;
    let victim = team.opponent();
    let after = board.after(mv);

    if matches!(after.get(mv.to), Some(p) if p.team == team) && is_threatened(&after, mv.to, team) {
        return ForkSeverity::None;
    }

    let forked = forked_squares(board, mv);
    if forked.len() < 2 {
        return ForkSeverity::None;
    }

    for reply in movegen::legal_moves(&after, victim) {
        let answered = after.after(reply);
        let hanging = |sq: Square| {
            matches!(answered.get(sq), Some(p) if p.team == victim)
                && is_threatened(&answered, sq, victim)
        };
        let still_hanging = hanging(reply.to)
            || forked
                .iter()
                .map(|&sq| if sq == reply.from { reply.to } else { sq })
                .any(hanging);
        if !still_hanging {
            return ForkSeverity::Mitigable;
        }
    }
    ForkSeverity::Decisive
}
