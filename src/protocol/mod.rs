//! Text protocol handling.
//!
//! Position notation for boards and moves, and the command parser for the
//! engine's stdin/stdout main loop.

pub mod notation;
pub mod parser;

pub use notation::{
    encode_position, parse_move, parse_pieces, parse_position, NotationError,
};
pub use parser::{parse_command, Command};
