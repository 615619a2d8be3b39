//! Ownership and occupancy questions about a board.
//!
//! An empty square is never own, never opposing, and never a tower.

use crate::board::{Board, Move, Piece, Square, Team};
use crate::movegen;

/// True iff `sq` holds a piece of `me`.
#[inline]
pub fn is_own(board: &Board, sq: Square, me: Team) -> bool {
    matches!(board.get(sq), Some(p) if p.team == me)
}

/// True iff `sq` holds a piece of `me`'s opponent.
#[inline]
pub fn is_opponent(board: &Board, sq: Square, me: Team) -> bool {
    matches!(board.get(sq), Some(p) if p.team != me)
}

/// True iff `sq` holds a stack taller than one.
#[inline]
pub fn is_tower(board: &Board, sq: Square) -> bool {
    matches!(board.get(sq), Some(p) if p.is_tower())
}

/// Legal moves of `team`, as if it were `team`'s turn.
pub fn moves_owned_by(board: &Board, team: Team) -> Vec<Move> {
    movegen::legal_moves(board, team)
}

/// Every square occupied by `team`, with its piece, in square order.
pub fn pieces_owned_by(board: &Board, team: Team) -> Vec<(Square, Piece)> {
    board.pieces_of(team).collect()
}
