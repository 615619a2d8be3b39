//! Game rules.
//!
//! Turn bookkeeping, amber scoring, game end, and start-position setup on
//! top of the board's piece mechanics.

pub mod position;
pub mod setup;

pub use position::{Position, LAST_TURN, TURN_LIMIT, WIN_SCORE};
pub use setup::{random_start, start_position};
