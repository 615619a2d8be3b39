//! Breakthrough races to the far column.
//!
//! A light piece past the midline that can keep stepping forward without
//! being caught scores when it reaches the far column. The race search is
//! an and-or tree: every plausible interception must be survived by at
//! least one further advance. Its depth is bounded by the runner's
//! remaining distance, so it always terminates.

use crate::board::{Board, Move, Square, Team, BOARD_SIZE};
use crate::movegen;

use super::threat::{exposes_mover, is_threatened};

/// Columns from the home edge a piece must have covered to count as past
/// the midline.
const MIDLINE_DISTANCE: u8 = BOARD_SIZE / 2;

#[inline]
fn advances(team: Team, mv: Move) -> bool {
    mv.dx() * team.direction() > 0
}

/// Forward steps of unthreatened, non-tower light pieces of `team` that
/// are past the midline, excluding steps onto a threatened square.
pub fn breakthrough_candidates(board: &Board, team: Team) -> Vec<Move> {
    let mut candidates = Vec::new();
    for (from, piece) in board.pieces_of(team) {
        if piece.is_tower() || !piece.kind.is_light() {
            continue;
        }
        if team.distance_from_home(from.x) < MIDLINE_DISTANCE {
            continue;
        }
        if is_threatened(board, from, team) {
            continue;
        }
        candidates.extend(
            movegen::moves_from(board, from)
                .into_iter()
                .filter(|&mv| advances(team, mv) && !exposes_mover(board, mv)),
        );
    }
    candidates
}

/// Whether an opposing reply landing on `target` could get in the way of a
/// runner on `runner` with `remaining` columns to go.
fn can_intercept(team: Team, runner: Square, target: Square, remaining: u8) -> bool {
    let lateral = runner.y.abs_diff(target.y);
    let ahead = team.distance_from_home(target.x) as i16 - team.distance_from_home(runner.x) as i16;
    lateral <= remaining.max(1) && (0..=remaining as i16).contains(&ahead)
}

/// True if the runner starting with `mv` reaches the far column whatever
/// the opponent does within the interception window.
pub fn race_survivable(board: &Board, mv: Move) -> bool {
    let Some(runner) = board.get(mv.from) else {
        return false;
    };
    let depth = runner.team.distance_to_far(mv.from.x);
    race(board, mv, runner.team, depth)
}

fn race(board: &Board, mv: Move, team: Team, depth: u8) -> bool {
    if mv.to.x == team.far_column() {
        return true;
    }
    if depth == 0 {
        return false;
    }

    let after = board.after(mv);
    if is_threatened(&after, mv.to, team) {
        return false;
    }

    let remaining = team.distance_to_far(mv.to.x);
    let interceptions: Vec<Move> = movegen::legal_moves(&after, team.opponent())
        .into_iter()
        .filter(|reply| can_intercept(team, mv.to, reply.to, remaining))
        .collect();
    if interceptions.is_empty() {
        return true;
    }

    interceptions.into_iter().all(|reply| {
        let answered = after.after(reply);
        if !matches!(answered.get(mv.to), Some(p) if p.team == team) {
            return false;
        }
        movegen::moves_from(&answered, mv.to)
            .into_iter()
            .filter(|&next| advances(team, next))
            .any(|next| race(&answered, next, team, depth - 1))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::notation::parse_pieces;

    fn mv(from: (u8, u8), to: (u8, u8)) -> Move {
        Move::new(Square::new(from.0, from.1), Square::new(to.0, to.1))
    }

    #[test]
    fn candidates_need_light_untowered_piece_past_midline() {
        let b = parse_pieces("0C53,0C23,0L54,0G44*2,1G00").unwrap();
        assert_eq!(
            breakthrough_candidates(&b, Team::One),
            vec![mv((5, 3), (6, 4)), mv((5, 3), (6, 2))]
        );
    }

    #[test]
    fn candidates_skip_threatened_landing_squares() {
        let b = parse_pieces("0C53,1G74").unwrap();
        assert_eq!(breakthrough_candidates(&b, Team::One), vec![mv((5, 3), (6, 2))]);
    }

    #[test]
    fn candidates_for_team_two_run_toward_column_zero() {
        let b = parse_pieces("1S33,0G77").unwrap();
        let candidates = breakthrough_candidates(&b, Team::Two);
        assert!(!candidates.is_empty());
        assert!(candidates.iter().all(|m| m.to.x < m.from.x));
    }

    #[test]
    fn unopposed_runner_survives() {
        let b = parse_pieces("0C53,1G00").unwrap();
        assert!(race_survivable(&b, mv((5, 3), (6, 4))));

        let far = parse_pieces("0C43,1G00").unwrap();
        assert!(race_survivable(&far, mv((4, 3), (5, 4))));
    }

    #[test]
    fn capturable_runner_fails() {
        // 62 is covered by the gull on 52, so it is not threatened, but the
        // gull on 61 can still take the runner there.
        let b = parse_pieces("0C53,0G52,1G61").unwrap();
        assert!(!race_survivable(&b, mv((5, 3), (6, 2))));
        assert!(race_survivable(&b, mv((5, 3), (6, 4))));
    }

    #[test]
    fn step_onto_far_column_always_survives() {
        let b = parse_pieces("0C63,1G00").unwrap();
        assert!(race_survivable(&b, mv((6, 3), (7, 4))));
    }

    #[test]
    fn race_from_empty_square_fails() {
        let b = parse_pieces("1G00").unwrap();
        assert!(!race_survivable(&b, mv((5, 3), (6, 4))));
    }
}
