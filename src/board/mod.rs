//! Board representation.
//!
//! Squares, teams, piece kinds, moves, and the piece placement itself.

pub mod moves;
pub mod piece;
pub mod square;
pub mod state;

pub use moves::Move;
pub use piece::{Piece, PieceKind, Team, ALL_KINDS, ALL_TEAMS};
pub use square::{Offset, Square, BOARD_SIZE, SQUARE_COUNT};
pub use state::{Board, MoveOutcome, SCORING_STACK_HEIGHT};
