//! Board contents.
//!
//! A fixed array of optional pieces indexed by `Square::index`. Cloning is a
//! plain copy, so a simulated board never shares storage with its source.

use super::moves::Move;
use super::piece::{Piece, Team};
use super::square::{Square, SQUARE_COUNT};

/// Height at which a stack is removed and scores for its owner.
pub const SCORING_STACK_HEIGHT: u8 = 3;

/// Result of applying one move to a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    /// Number of the mover's stones that were captured under it.
    pub captured: u8,
    /// Points earned by the mover's team.
    pub points: u8,
}

/// Piece placement on the 8x8 board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; SQUARE_COUNT],
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

impl Board {
    /// Creates a board with no pieces.
    pub fn empty() -> Self {
        Board {
            squares: [None; SQUARE_COUNT],
        }
    }

    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()]
    }

    /// Places a piece. Returns false if the square is already occupied.
    pub fn place(&mut self, sq: Square, piece: Piece) -> bool {
        let slot = &mut self.squares[sq.index()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(piece);
        true
    }

    /// Removes and returns the piece on `sq`.
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()].take()
    }

    /// Iterates over occupied squares in index order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.map(|p| (Square::from_index(i), p)))
    }

    /// Iterates over the squares occupied by `team`, in index order.
    pub fn pieces_of(&self, team: Team) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.team == team)
    }

    /// Number of pieces (stacks) owned by `team`.
    pub fn count_of(&self, team: Team) -> usize {
        self.pieces_of(team).count()
    }

    /// Applies a move in place.
    ///
    /// Capturing stacks the mover on the captured piece. A stack reaching
    /// [`SCORING_STACK_HEIGHT`] leaves the board and scores; otherwise a light
    /// piece ending on its far column leaves the board and scores. An empty
    /// `from` square leaves the board untouched.
    pub fn apply(&mut self, mv: Move) -> MoveOutcome {
        let Some(mut moving) = self.remove(mv.from) else {
            return MoveOutcome::default();
        };
        let mut outcome = MoveOutcome::default();

        if let Some(target) = self.squares[mv.to.index()] {
            if target.team != moving.team {
                moving.count += target.count;
                outcome.captured = target.count;
            }
        }

        if moving.count >= SCORING_STACK_HEIGHT {
            self.squares[mv.to.index()] = None;
            outcome.points = 1;
        } else if moving.kind.is_light() && mv.to.x == moving.team.far_column() {
            self.squares[mv.to.index()] = None;
            outcome.points = 1;
        } else {
            self.squares[mv.to.index()] = Some(moving);
        }
        outcome
    }

    /// Returns a copy of this board with `mv` applied.
    pub fn after(&self, mv: Move) -> Board {
        let mut next = *self;
        next.apply(mv);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::piece::PieceKind;

    fn sq(x: u8, y: u8) -> Square {
        Square::new(x, y)
    }

    #[test]
    fn empty_board_has_no_pieces() {
        let board = Board::empty();
        assert_eq!(board.pieces().count(), 0);
        assert!(board.get(sq(3, 3)).is_none());
    }

    #[test]
    fn place_rejects_duplicate() {
        let mut board = Board::empty();
        assert!(board.place(sq(0, 0), Piece::new(PieceKind::Gull, Team::One)));
        assert!(!board.place(sq(0, 0), Piece::new(PieceKind::Seal, Team::Two)));
    }

    #[test]
    fn capture_stacks_mover_on_top() {
        let mut board = Board::empty();
        board.place(sq(2, 2), Piece::new(PieceKind::Gull, Team::One));
        board.place(sq(3, 2), Piece::new(PieceKind::Seal, Team::Two));

        let outcome = board.apply(Move::new(sq(2, 2), sq(3, 2)));
        assert_eq!(outcome, MoveOutcome { captured: 1, points: 0 });
        assert_eq!(
            board.get(sq(3, 2)),
            Some(Piece::tower(PieceKind::Gull, Team::One, 2))
        );
        assert!(board.get(sq(2, 2)).is_none());
    }

    #[test]
    fn stack_of_three_scores_and_leaves() {
        let mut board = Board::empty();
        board.place(sq(2, 2), Piece::new(PieceKind::Gull, Team::One));
        board.place(sq(3, 2), Piece::tower(PieceKind::Seal, Team::Two, 2));

        let outcome = board.apply(Move::new(sq(2, 2), sq(3, 2)));
        assert_eq!(outcome.points, 1);
        assert!(board.get(sq(3, 2)).is_none());
        assert_eq!(board.pieces().count(), 0);
    }

    #[test]
    fn light_piece_on_far_column_scores() {
        let mut board = Board::empty();
        board.place(sq(6, 3), Piece::new(PieceKind::Cockle, Team::One));
        let outcome = board.apply(Move::new(sq(6, 3), sq(7, 4)));
        assert_eq!(outcome.points, 1);
        assert!(board.get(sq(7, 4)).is_none());
    }

    #[test]
    fn seal_on_far_column_stays() {
        let mut board = Board::empty();
        board.place(sq(5, 3), Piece::new(PieceKind::Seal, Team::One));
        let outcome = board.apply(Move::new(sq(5, 3), sq(7, 4)));
        assert_eq!(outcome.points, 0);
        assert!(board.get(sq(7, 4)).is_some());
    }

    #[test]
    fn after_leaves_source_untouched() {
        let mut board = Board::empty();
        board.place(sq(1, 1), Piece::new(PieceKind::Gull, Team::Two));
        let before = board;
        let next = board.after(Move::new(sq(1, 1), sq(1, 2)));
        assert_eq!(board, before);
        assert!(next.get(sq(1, 2)).is_some());
    }

    #[test]
    fn apply_from_empty_square_is_noop() {
        let mut board = Board::empty();
        board.place(sq(4, 4), Piece::new(PieceKind::Gull, Team::Two));
        let before = board;
        let outcome = board.apply(Move::new(sq(0, 0), sq(1, 1)));
        assert_eq!(outcome, MoveOutcome::default());
        assert_eq!(board, before);
    }
}
