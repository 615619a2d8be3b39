//! Threat and coverage predicates.
//!
//! Every predicate takes the team that owns (or would own) the square being
//! asked about. A square is *attackable* when an opposing move lands on it,
//! *defended* when a friendly piece could recapture there, and *threatened*
//! when it is attackable and either undefended or attacked by a tower. A
//! tower capture always completes a scoring stack, so defense does not help
//! against it, and a tower is never counted as defended for the same reason.

use crate::board::{Board, Move, Piece, Square, Team};

use super::query::is_tower;

/// True if `piece` standing on `from` has `target` among its offsets.
#[inline]
fn reaches(from: Square, piece: &Piece, target: Square) -> bool {
    piece
        .move_offsets()
        .iter()
        .any(|&off| from.offset(off) == Some(target))
}

/// Squares of opposing pieces that have a legal move landing on `sq`.
pub fn attackers_of(board: &Board, sq: Square, team: Team) -> Vec<Square> {
    let attacker = team.opponent();
    if matches!(board.get(sq), Some(p) if p.team == attacker) {
        return Vec::new();
    }
    board
        .pieces_of(attacker)
        .filter(|(from, piece)| reaches(*from, piece, sq))
        .map(|(from, _)| from)
        .collect()
}

/// Squares of `team` pieces that could recapture on `sq`. Empty for towers.
pub fn defenders_of(board: &Board, sq: Square, team: Team) -> Vec<Square> {
    if is_tower(board, sq) {
        return Vec::new();
    }
    board
        .pieces_of(team)
        .filter(|(from, piece)| *from != sq && reaches(*from, piece, sq))
        .map(|(from, _)| from)
        .collect()
}

/// True if a friendly piece other than the occupant could recapture on `sq`.
pub fn is_defended(board: &Board, sq: Square, team: Team) -> bool {
    if is_tower(board, sq) {
        return false;
    }
    board
        .pieces_of(team)
        .any(|(from, piece)| from != sq && reaches(from, &piece, sq))
}

/// True if some opposing piece can land on `sq`, defended or not.
pub fn is_attackable(board: &Board, sq: Square, team: Team) -> bool {
    !attackers_of(board, sq, team).is_empty()
}

/// Attackable, and either undefended or attacked by a tower.
pub fn is_threatened(board: &Board, sq: Square, team: Team) -> bool {
    let attackers = attackers_of(board, sq, team);
    if attackers.is_empty() {
        return false;
    }
    !is_defended(board, sq, team) || attackers.iter().any(|&a| is_tower(board, a))
}

/// Defended, attackable, and not threatened: taking it loses the exchange.
pub fn is_protected(board: &Board, sq: Square, team: Team) -> bool {
    is_defended(board, sq, team) && is_attackable(board, sq, team) && !is_threatened(board, sq, team)
}

/// Opposing squares the piece on `sq` currently threatens.
pub fn covered_by(board: &Board, sq: Square) -> Vec<Square> {
    let Some(piece) = board.get(sq) else {
        return Vec::new();
    };
    let victim = piece.team.opponent();
    piece
        .move_offsets()
        .iter()
        .filter_map(|&off| sq.offset(off))
        .filter(|&to| matches!(board.get(to), Some(p) if p.team == victim))
        .filter(|&to| piece.is_tower() || !is_defended(board, to, victim))
        .collect()
}

/// Friendly squares the piece on `sq` covers.
pub fn protects(board: &Board, sq: Square) -> Vec<Square> {
    let Some(piece) = board.get(sq) else {
        return Vec::new();
    };
    piece
        .move_offsets()
        .iter()
        .filter_map(|&off| sq.offset(off))
        .filter(|&to| matches!(board.get(to), Some(p) if p.team == piece.team))
        .collect()
}

/// Squares of `team` pieces that are threatened.
pub fn threatened_pieces(board: &Board, team: Team) -> Vec<Square> {
    board
        .pieces_of(team)
        .map(|(sq, _)| sq)
        .filter(|&sq| is_threatened(board, sq, team))
        .collect()
}

/// Squares of `team` pieces that are defended.
pub fn defended_pieces(board: &Board, team: Team) -> Vec<Square> {
    board
        .pieces_of(team)
        .map(|(sq, _)| sq)
        .filter(|&sq| is_defended(board, sq, team))
        .collect()
}

/// Squares of `team` pieces that are protected.
pub fn protected_pieces(board: &Board, team: Team) -> Vec<Square> {
    board
        .pieces_of(team)
        .map(|(sq, _)| sq)
        .filter(|&sq| is_protected(board, sq, team))
        .collect()
}

/// Pieces of `team` that threaten at least one opposing piece.
pub fn threatening_pieces(board: &Board, team: Team) -> Vec<Square> {
    board
        .pieces_of(team)
        .map(|(sq, _)| sq)
        .filter(|&sq| !covered_by(board, sq).is_empty())
        .collect()
}

/// Pieces of `team` shielding a friendly square the opponent can attack.
/// Moving one of them away would expose what it covers.
pub fn blocked_pieces(board: &Board, team: Team) -> Vec<Square> {
    board
        .pieces_of(team)
        .map(|(sq, _)| sq)
        .filter(|&sq| {
            protects(board, sq)
                .into_iter()
                .any(|covered| is_attackable(board, covered, team))
        })
        .collect()
}

/// Number of threatened `team` pieces.
pub fn threatened_count(board: &Board, team: Team) -> usize {
    threatened_pieces(board, team).len()
}

/// Number of defended `team` pieces.
pub fn defended_count(board: &Board, team: Team) -> usize {
    defended_pieces(board, team).len()
}

/// Number of protected `team` pieces.
pub fn protected_count(board: &Board, team: Team) -> usize {
    protected_pieces(board, team).len()
}

/// Number of blocked `team` pieces.
pub fn blocked_count(board: &Board, team: Team) -> usize {
    blocked_pieces(board, team).len()
}

/// `metric(after) - metric(before)` for `mv` applied to a copy of `board`.
/// Positive means the metric grew.
pub fn delta_after_move<F>(board: &Board, mv: Move, metric: F) -> i32
where
    F: Fn(&Board) -> usize,
{
    let after = board.after(mv);
    metric(&after) as i32 - metric(board) as i32
}

/// True if the moved piece is still on the board after `mv` and threatened there.
pub fn exposes_mover(board: &Board, mv: Move) -> bool {
    let Some(mover) = board.get(mv.from) else {
        return false;
    };
    let after = board.after(mv);
    match after.get(mv.to) {
        Some(p) if p.team == mover.team => is_threatened(&after, mv.to, mover.team),
        _ => false,
    }
}
