//! Board coordinates.
//!
//! A square is a `(column, row)` pair on the 8x8 board. The column encodes
//! the distance from each team's home edge; the row is lateral.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of columns and rows on the board.
pub const BOARD_SIZE: u8 = 8;

/// Number of squares on the board.
pub const SQUARE_COUNT: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);

/// A relative displacement applied to a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Offset {
    pub dx: i8,
    pub dy: i8,
}

impl Offset {
    pub const fn new(dx: i8, dy: i8) -> Self {
        Offset { dx, dy }
    }
}

/// A board coordinate. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    pub x: u8,
    pub y: u8,
}

impl Square {
    /// Creates a square. Callers pass in-bounds coordinates.
    pub const fn new(x: u8, y: u8) -> Self {
        Square { x, y }
    }

    /// Returns the array index of this square (`y * 8 + x`).
    #[inline]
    pub const fn index(self) -> usize {
        self.y as usize * BOARD_SIZE as usize + self.x as usize
    }

    /// Inverse of [`Square::index`].
    #[inline]
    pub const fn from_index(idx: usize) -> Self {
        Square {
            x: (idx % BOARD_SIZE as usize) as u8,
            y: (idx / BOARD_SIZE as usize) as u8,
        }
    }

    /// Returns the square displaced by `offset`, or None if it leaves the board.
    #[inline]
    pub fn offset(self, offset: Offset) -> Option<Square> {
        let nx = self.x as i16 + offset.dx as i16;
        let ny = self.y as i16 + offset.dy as i16;
        if nx < 0 || ny < 0 || nx >= BOARD_SIZE as i16 || ny >= BOARD_SIZE as i16 {
            return None;
        }
        Some(Square {
            x: nx as u8,
            y: ny as u8,
        })
    }

    /// Iterates over all 64 squares in index order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..SQUARE_COUNT).map(Square::from_index)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.x, self.y)
    }
}
