//! Move representation.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::square::Square;

/// A move of the piece on `from` to `to`.
///
/// Landing on an opposing piece captures it and stacks the mover on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub const fn new(from: Square, to: Square) -> Self {
        Move { from, to }
    }

    /// Signed column displacement of the move.
    #[inline]
    pub fn dx(&self) -> i8 {
        self.to.x as i8 - self.from.x as i8
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}
