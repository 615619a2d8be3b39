//! Start-position setup.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Board, Piece, PieceKind, Square, Team, ALL_KINDS, BOARD_SIZE};

use super::position::Position;

/// Builds the start position from team One's home-column order (row 0 first).
/// Team Two mirrors it on the opposite column.
pub fn start_position(order: &[PieceKind; BOARD_SIZE as usize]) -> Position {
    let mut board = Board::empty();
    for (y, &kind) in order.iter().enumerate() {
        let y = y as u8;
        board.place(
            Square::new(Team::One.home_column(), y),
            Piece::new(kind, Team::One),
        );
        board.place(
            Square::new(Team::Two.home_column(), y),
            Piece::new(kind, Team::Two),
        );
    }
    Position::new(board, 0)
}

/// Shuffles two of each kind onto the home columns.
pub fn random_start(rng: &mut impl Rng) -> Position {
    let mut order = [PieceKind::Cockle; BOARD_SIZE as usize];
    for (i, slot) in order.iter_mut().enumerate() {
        *slot = ALL_KINDS[i / 2];
    }
    order.shuffle(rng);
    start_position(&order)
}
