//! Legal move generation.
//!
//! Generates moves for an arbitrary team on an arbitrary board, independent
//! of whose turn it really is. The tactical analysis relies on this to ask
//! "what could the opponent do right now".

use crate::board::{Board, Move, Offset, Square, Team};

/// All legal moves for `team` on `board`, ordered by origin square index and
/// then by the piece's offset order.
pub fn legal_moves(board: &Board, team: Team) -> Vec<Move> {
    let mut moves = Vec::with_capacity(32);
    for (from, piece) in board.pieces_of(team) {
        push_piece_moves(board, from, piece.move_offsets(), team, &mut moves);
    }
    moves
}

/// Legal moves of the piece on `from`, or an empty list if the square is empty.
pub fn moves_from(board: &Board, from: Square) -> Vec<Move> {
    let mut moves = Vec::new();
    if let Some(piece) = board.get(from) {
        push_piece_moves(board, from, piece.move_offsets(), piece.team, &mut moves);
    }
    moves
}

fn push_piece_moves(
    board: &Board,
    from: Square,
    offsets: &[Offset],
    team: Team,
    out: &mut Vec<Move>,
) {
    for &off in offsets {
        let Some(to) = from.offset(off) else {
            continue;
        };
        match board.get(to) {
            Some(target) if target.team == team => continue,
            _ => out.push(Move::new(from, to)),
        }
    }
}

/// Returns true if `mv` is among `team`'s legal moves on `board`.
pub fn is_legal(board: &Board, team: Team, mv: Move) -> bool {
    match board.get(mv.from) {
        Some(p) if p.team == team => moves_from(board, mv.from).contains(&mv),
        _ => false,
    }
}
