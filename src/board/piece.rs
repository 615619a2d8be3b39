//! Teams, piece kinds, and pieces.
//!
//! Each kind carries its movement offsets and its base value. A piece with
//! `count > 1` is a tower: a stack formed by capturing, moving with the
//! offsets of the kind on top.

use serde::{Deserialize, Serialize};

use super::square::{Offset, BOARD_SIZE};

/// One of the two teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    One,
    Two,
}

/// Both teams in index order.
pub const ALL_TEAMS: [Team; 2] = [Team::One, Team::Two];

impl Team {
    /// Returns 0 for team One and 1 for team Two.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Team::One => 0,
            Team::Two => 1,
        }
    }

    /// Parses a team from its index digit.
    pub fn from_index(idx: usize) -> Option<Team> {
        match idx {
            0 => Some(Team::One),
            1 => Some(Team::Two),
            _ => None,
        }
    }

    #[inline]
    pub const fn opponent(self) -> Team {
        match self {
            Team::One => Team::Two,
            Team::Two => Team::One,
        }
    }

    /// Forward direction along the x axis.
    #[inline]
    pub const fn direction(self) -> i8 {
        match self {
            Team::One => 1,
            Team::Two => -1,
        }
    }

    /// The column this team starts on.
    #[inline]
    pub const fn home_column(self) -> u8 {
        match self {
            Team::One => 0,
            Team::Two => BOARD_SIZE - 1,
        }
    }

    /// The column light pieces must reach to score.
    #[inline]
    pub const fn far_column(self) -> u8 {
        self.opponent().home_column()
    }

    /// Distance of column `x` from this team's home column.
    #[inline]
    pub const fn distance_from_home(self, x: u8) -> u8 {
        match self {
            Team::One => x,
            Team::Two => BOARD_SIZE - 1 - x,
        }
    }

    /// Remaining columns from `x` to this team's far column.
    #[inline]
    pub const fn distance_to_far(self, x: u8) -> u8 {
        BOARD_SIZE - 1 - self.distance_from_home(x)
    }
}

const COCKLE_ONE: [Offset; 2] = [Offset::new(1, 1), Offset::new(1, -1)];
const COCKLE_TWO: [Offset; 2] = [Offset::new(-1, 1), Offset::new(-1, -1)];

const GULL: [Offset; 4] = [
    Offset::new(1, 0),
    Offset::new(-1, 0),
    Offset::new(0, 1),
    Offset::new(0, -1),
];

const STARFISH_ONE: [Offset; 5] = [
    Offset::new(1, 0),
    Offset::new(1, 1),
    Offset::new(1, -1),
    Offset::new(-1, 1),
    Offset::new(-1, -1),
];
const STARFISH_TWO: [Offset; 5] = [
    Offset::new(-1, 0),
    Offset::new(1, 1),
    Offset::new(1, -1),
    Offset::new(-1, 1),
    Offset::new(-1, -1),
];

const SEAL: [Offset; 8] = [
    Offset::new(1, 2),
    Offset::new(1, -2),
    Offset::new(-1, 2),
    Offset::new(-1, -2),
    Offset::new(2, 1),
    Offset::new(2, -1),
    Offset::new(-2, 1),
    Offset::new(-2, -1),
];

/// The four piece ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    /// Moves one step diagonally forward.
    Cockle,
    /// Moves one step orthogonally.
    Gull,
    /// Moves one step forward or one step diagonally.
    Starfish,
    /// Jumps like a knight; does not score on the far column.
    Seal,
}

/// All kinds, used for start-position setup.
pub const ALL_KINDS: [PieceKind; 4] = [
    PieceKind::Cockle,
    PieceKind::Gull,
    PieceKind::Starfish,
    PieceKind::Seal,
];

impl PieceKind {
    /// Returns the single-character notation abbreviation.
    pub const fn notation_char(self) -> char {
        match self {
            PieceKind::Cockle => 'C',
            PieceKind::Gull => 'G',
            PieceKind::Starfish => 'S',
            PieceKind::Seal => 'L',
        }
    }

    /// Parses a kind from its notation abbreviation.
    pub fn from_notation_char(c: char) -> Option<PieceKind> {
        match c {
            'C' => Some(PieceKind::Cockle),
            'G' => Some(PieceKind::Gull),
            'S' => Some(PieceKind::Starfish),
            'L' => Some(PieceKind::Seal),
            _ => None,
        }
    }

    /// Light pieces score by reaching the far column.
    #[inline]
    pub const fn is_light(self) -> bool {
        !matches!(self, PieceKind::Seal)
    }

    /// Base value by rank.
    #[inline]
    pub const fn base_value(self) -> i32 {
        match self {
            PieceKind::Seal | PieceKind::Starfish => 3,
            PieceKind::Gull => 2,
            PieceKind::Cockle => 1,
        }
    }

    /// Movement offsets for a piece of this kind owned by `team`.
    pub fn offsets(self, team: Team) -> &'static [Offset] {
        match (self, team) {
            (PieceKind::Cockle, Team::One) => &COCKLE_ONE,
            (PieceKind::Cockle, Team::Two) => &COCKLE_TWO,
            (PieceKind::Gull, _) => &GULL,
            (PieceKind::Starfish, Team::One) => &STARFISH_ONE,
            (PieceKind::Starfish, Team::Two) => &STARFISH_TWO,
            (PieceKind::Seal, _) => &SEAL,
        }
    }
}

/// A piece (or tower) on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub team: Team,
    /// Stack height; greater than one marks a tower.
    pub count: u8,
}

impl Piece {
    /// Creates a single (non-tower) piece.
    pub const fn new(kind: PieceKind, team: Team) -> Self {
        Piece {
            kind,
            team,
            count: 1,
        }
    }

    /// Creates a stack of the given height.
    pub const fn tower(kind: PieceKind, team: Team, count: u8) -> Self {
        Piece { kind, team, count }
    }

    #[inline]
    pub const fn is_tower(&self) -> bool {
        self.count > 1
    }

    /// Movement offsets of the unit on top.
    #[inline]
    pub fn move_offsets(&self) -> &'static [Offset] {
        self.kind.offsets(self.team)
    }
}
