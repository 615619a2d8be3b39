//! Turn context: board, turn number, and score so far.

use crate::board::{Board, Move, Team};
use crate::movegen;

/// Number of turns (moves by either team) in a full game.
pub const TURN_LIMIT: u32 = 60;

/// Index of the last turn that can be played.
pub const LAST_TURN: u32 = TURN_LIMIT - 1;

/// Ambers needed to win.
pub const WIN_SCORE: u8 = 2;

/// A board plus whose turn it is and the ambers collected by each team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub board: Board,
    /// Zero-based turn counter. Team One moves on even turns.
    pub turn: u32,
    /// Ambers per team, indexed by `Team::index`.
    pub ambers: [u8; 2],
}

impl Position {
    /// Creates a position with no ambers collected.
    pub fn new(board: Board, turn: u32) -> Self {
        Position {
            board,
            turn,
            ambers: [0, 0],
        }
    }

    /// The team whose turn it is.
    #[inline]
    pub fn current_team(&self) -> Team {
        if self.turn % 2 == 0 {
            Team::One
        } else {
            Team::Two
        }
    }

    /// Legal moves for `as_team` on this board, whoever is actually to move.
    pub fn legal_moves(&self, as_team: Team) -> Vec<Move> {
        movegen::legal_moves(&self.board, as_team)
    }

    #[inline]
    pub fn score_for(&self, team: Team) -> u8 {
        self.ambers[team.index()]
    }

    /// Returns a copy with `mv` applied, points credited to the mover's team,
    /// and the turn advanced.
    pub fn simulate(&self, mv: Move) -> Position {
        let mut next = *self;
        if let Some(mover) = self.board.get(mv.from) {
            let outcome = next.board.apply(mv);
            next.ambers[mover.team.index()] += outcome.points;
        }
        next.turn += 1;
        next
    }

    /// True on the last turn the game allows.
    #[inline]
    pub fn is_final_turn(&self) -> bool {
        self.turn >= LAST_TURN
    }

    /// True when the turn limit is reached, a completed round left a team
    /// at the winning score, or the team to move is stuck.
    pub fn is_game_over(&self) -> bool {
        if self.turn >= TURN_LIMIT {
            return true;
        }
        if self.turn % 2 == 0 && self.ambers.iter().any(|&a| a >= WIN_SCORE) {
            return true;
        }
        self.legal_moves(self.current_team()).is_empty()
    }

    /// The winner of a finished game, or None for a draw or a running game.
    pub fn winner(&self) -> Option<Team> {
        if !self.is_game_over() {
            return None;
        }
        if self.turn < TURN_LIMIT && self.legal_moves(self.current_team()).is_empty() {
            return Some(self.current_team().opponent());
        }
        let [one, two] = self.ambers;
        match one.cmp(&two) {
            std::cmp::Ordering::Greater => Some(Team::One),
            std::cmp::Ordering::Less => Some(Team::Two),
            std::cmp::Ordering::Equal => None,
        }
    }
}
