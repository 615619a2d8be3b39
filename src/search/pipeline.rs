//! The per-turn decision pipeline.
//!
//! Stages run in a fixed order and the first one that produces a move wins:
//!
//! 1. immediate win
//! 2. defense of threatened pieces (skipped on the final turn)
//! 3. opponent breakthrough check
//! 4. scoring
//! 5. own breakthrough
//! 6. safe capture
//! 7. fork prevention
//! 8. fork creation
//! 9. opponent blockade
//! 10. pruned fallback
//!
//! Any error or panic inside stages 1-10 is caught at the top and answered
//! by recovery (stage 11), which scores the last candidate set a stage was
//! working on, or failing that every legal move.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use serde::Serialize;
use thiserror::Error;

use crate::board::{Board, Move, Square, Team};
use crate::config::EngineOptions;
use crate::eval::{pick_best, score_candidates, ScoreError, WeightedSampler};
use crate::movegen;
use crate::rules::Position;
use crate::tactics::{
    attackers_of, blocked_count, breakthrough_candidates, can_safely_capture, delta_after_move,
    exposes_mover, fork_severity, forked_squares, is_threatened, is_tower, race_survivable,
    scoring_moves, threatened_count, threatened_pieces, winning_moves, ForkSeverity,
};

/// Pipeline stages, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Stage {
    ImmediateWin,
    Defense,
    OpponentBreakthrough,
    Scoring,
    OwnBreakthrough,
    SafeCapture,
    ForkPrevention,
    ForkCreation,
    Blockade,
    Fallback,
    Recovery,
}

/// The stages that run before recovery, in order.
const ORDER: [Stage; 10] = [
    Stage::ImmediateWin,
    Stage::Defense,
    Stage::OpponentBreakthrough,
    Stage::Scoring,
    Stage::OwnBreakthrough,
    Stage::SafeCapture,
    Stage::ForkPrevention,
    Stage::ForkCreation,
    Stage::Blockade,
    Stage::Fallback,
];

impl Stage {
    /// One-based position in the pipeline.
    pub const fn number(self) -> u8 {
        self as u8 + 1
    }

    pub const fn name(self) -> &'static str {
        match self {
            Stage::ImmediateWin => "immediate-win",
            Stage::Defense => "defense",
            Stage::OpponentBreakthrough => "opponent-breakthrough",
            Stage::Scoring => "scoring",
            Stage::OwnBreakthrough => "own-breakthrough",
            Stage::SafeCapture => "safe-capture",
            Stage::ForkPrevention => "fork-prevention",
            Stage::ForkCreation => "fork-creation",
            Stage::Blockade => "blockade",
            Stage::Fallback => "fallback",
            Stage::Recovery => "recovery",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fault raised inside a stage.
#[derive(Debug, Error)]
pub enum DecisionError {
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error("injected fault in stage {0}")]
    Injected(Stage),
    #[error("stage panicked: {0}")]
    Panicked(String),
}

/// How an injected fault manifests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The stage returns an error.
    Error,
    /// The stage panics.
    Panic,
}

/// The chosen move and the stage that chose it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub mv: Move,
    pub stage: Stage,
    /// True when the stages faulted and recovery picked the move.
    pub recovered: bool,
}

type StageResult = Result<Option<Move>, DecisionError>;

/// One turn's worth of move selection.
///
/// Built fresh for every turn from the current position; nothing carries
/// over between turns.
pub struct Pipeline<'a> {
    pos: &'a Position,
    me: Team,
    opp: Team,
    own_moves: Vec<Move>,
    intercept_breakthroughs: bool,
    sampler: Option<(WeightedSampler, &'a mut SmallRng)>,
    last_candidates: Vec<Move>,
    fault: Option<(Stage, Fault)>,
}

impl<'a> Pipeline<'a> {
    /// Prepares move selection for the team to move in `pos`.
    pub fn new(pos: &'a Position, options: &EngineOptions) -> Self {
        let me = pos.current_team();
        Pipeline {
            pos,
            me,
            opp: me.opponent(),
            own_moves: pos.legal_moves(me),
            intercept_breakthroughs: options.intercept_breakthroughs,
            sampler: None,
            last_candidates: Vec::new(),
            fault: None,
        }
    }

    /// Draws the final choice of every stage with `sampler` instead of
    /// taking the top-scored move.
    pub fn with_sampler(mut self, sampler: WeightedSampler, rng: &'a mut SmallRng) -> Self {
        self.sampler = Some((sampler, rng));
        self
    }

    /// Makes `stage` fail as soon as it is reached.
    pub fn inject_fault(mut self, stage: Stage, fault: Fault) -> Self {
        self.fault = Some((stage, fault));
        self
    }

    /// Runs the pipeline. Returns `None` only when there is no legal move.
    pub fn select(mut self) -> Option<Decision> {
        if self.own_moves.is_empty() {
            warn!("turn {}: {:?} has no legal moves", self.pos.turn, self.me);
            return None;
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run_stages()));
        let err = match outcome {
            Ok(Ok(decision)) => {
                info!(
                    "turn {}: {} chosen by stage {} ({})",
                    self.pos.turn,
                    decision.mv,
                    decision.stage.number(),
                    decision.stage
                );
                return Some(decision);
            }
            Ok(Err(e)) => e,
            Err(payload) => DecisionError::Panicked(panic_message(payload.as_ref())),
        };
        warn!("turn {}: {err}; recovering", self.pos.turn);
        self.recover()
    }

    fn run_stages(&mut self) -> Result<Decision, DecisionError> {
        for stage in ORDER {
            self.checkpoint(stage)?;
            if let Some(mv) = self.run_stage(stage)? {
                return Ok(Decision {
                    mv,
                    stage,
                    recovered: false,
                });
            }
            debug!("stage {} ({stage}) passed", stage.number());
        }
        Err(ScoreError::NoCandidates.into())
    }

    fn run_stage(&mut self, stage: Stage) -> StageResult {
        match stage {
            Stage::ImmediateWin => self.immediate_win(),
            Stage::Defense => self.defense(),
            Stage::OpponentBreakthrough => self.opponent_breakthrough(),
            Stage::Scoring => self.scoring(),
            Stage::OwnBreakthrough => self.own_breakthrough(),
            Stage::SafeCapture => self.safe_capture(),
            Stage::ForkPrevention => self.fork_prevention(),
            Stage::ForkCreation => self.fork_creation(),
            Stage::Blockade => self.blockade(),
            Stage::Fallback => self.fallback(),
            Stage::Recovery => Ok(None),
        }
    }

    fn checkpoint(&self, stage: Stage) -> Result<(), DecisionError> {
        match self.fault {
            Some((at, Fault::Error)) if at == stage => Err(DecisionError::Injected(stage)),
            Some((at, Fault::Panic)) if at == stage => panic!("injected panic in stage {stage}"),
            _ => Ok(()),
        }
    }

    #[inline]
    fn board(&self) -> &'a Board {
        &self.pos.board
    }

    /// Picks among `candidates`, remembering them for recovery.
    fn choose(&mut self, candidates: Vec<Move>) -> Result<Move, DecisionError> {
        self.last_candidates = candidates;
        if let Some((sampler, rng)) = self.sampler.as_mut() {
            let scored = score_candidates(self.pos, &self.last_candidates);
            return sampler
                .sample(&scored, &mut **rng)
                .ok_or(DecisionError::Score(ScoreError::NoCandidates));
        }
        Ok(pick_best(self.pos, &self.last_candidates)?)
    }

    fn own_threat_delta(&self, mv: Move) -> i32 {
        let me = self.me;
        delta_after_move(self.board(), mv, |b| threatened_count(b, me))
    }

    fn immediate_win(&mut self) -> StageResult {
        Ok(winning_moves(self.pos, self.me).first().copied())
    }

    fn defense(&mut self) -> StageResult {
        if self.pos.is_final_turn() {
            debug!("final turn, defense skipped");
            return Ok(None);
        }
        let board = self.board();
        let threatened = threatened_pieces(board, self.me);
        if threatened.is_empty() {
            return Ok(None);
        }
        debug!("threatened: {}", format_squares(&threatened));

        let mut attackers: Vec<Square> = Vec::new();
        for &sq in &threatened {
            for a in attackers_of(board, sq, self.me) {
                if !attackers.contains(&a) {
                    attackers.push(a);
                }
            }
        }
        let counter_captures: Vec<Move> = can_safely_capture(board, self.me)
            .into_iter()
            .filter(|m| attackers.contains(&m.to))
            .collect();
        if !counter_captures.is_empty() {
            let scoring = scoring_moves(self.pos, self.me);
            if let Some(&mv) = counter_captures.iter().find(|m| scoring.contains(m)) {
                return Ok(Some(mv));
            }
            return self.choose(counter_captures).map(Some);
        }

        let tower_threatened = threatened.iter().any(|&sq| is_tower(board, sq));
        let mut pool: Vec<Move> = if tower_threatened {
            self.own_moves
                .iter()
                .copied()
                .filter(|m| is_tower(board, m.from))
                .collect()
        } else {
            Vec::new()
        };
        if pool.is_empty() {
            pool = self.own_moves.clone();
        }

        let reductions: Vec<(Move, i32)> = pool
            .into_iter()
            .map(|m| (m, -self.own_threat_delta(m)))
            .collect();
        let Some(best) = reductions.iter().map(|&(_, r)| r).max() else {
            return Ok(None);
        };
        let relieving: Vec<Move> = reductions
            .into_iter()
            .filter(|&(_, r)| r == best)
            .map(|(m, _)| m)
            .collect();

        let safe = can_safely_capture(board, self.me);
        if let Some(&mv) = relieving.iter().find(|m| safe.contains(m)) {
            return Ok(Some(mv));
        }

        let decisive_fork = threatened.len() >= 2 && best < threatened.len() as i32;
        if tower_threatened || !decisive_fork {
            return self.choose(relieving).map(Some);
        }
        debug!("under a decisive fork, looking for counterplay");
        Ok(None)
    }

    fn opponent_breakthrough(&mut self) -> StageResult {
        let board = self.board();
        let runners: Vec<Move> = breakthrough_candidates(board, self.opp)
            .into_iter()
            .filter(|&m| race_survivable(board, m))
            .collect();
        if runners.is_empty() {
            return Ok(None);
        }
        info!("opponent breakthrough possible: {}", format_moves(&runners));
        if !self.intercept_breakthroughs {
            return Ok(None);
        }

        let opp = self.opp;
        let intercepts: Vec<Move> = self
            .own_moves
            .iter()
            .copied()
            .filter(|&m| !exposes_mover(board, m))
            .filter(|&m| {
                let after = board.after(m);
                !breakthrough_candidates(&after, opp)
                    .into_iter()
                    .any(|r| race_survivable(&after, r))
            })
            .collect();
        if intercepts.is_empty() {
            debug!("no move stops the breakthrough");
            return Ok(None);
        }
        self.choose(intercepts).map(Some)
    }

    fn scoring(&mut self) -> StageResult {
        let moves = scoring_moves(self.pos, self.me);
        if moves.is_empty() {
            return Ok(None);
        }
        self.choose(moves).map(Some)
    }

    fn own_breakthrough(&mut self) -> StageResult {
        let board = self.board();
        Ok(breakthrough_candidates(board, self.me)
            .into_iter()
            .find(|&m| race_survivable(board, m) && movegen::is_legal(board, self.me, m)))
    }

    fn safe_capture(&mut self) -> StageResult {
        let captures = can_safely_capture(self.board(), self.me);
        if captures.is_empty() {
            return Ok(None);
        }
        self.choose(captures).map(Some)
    }

    fn fork_prevention(&mut self) -> StageResult {
        let board = self.board();
        let mut guards: Vec<Move> = Vec::new();
        for reply in movegen::legal_moves(board, self.opp) {
            if fork_severity(board, reply) == ForkSeverity::None {
                continue;
            }
            let forked = forked_squares(board, reply);
            debug!("opponent fork {reply} on {}", format_squares(&forked));
            let answerable = self.answerable(&board.after(reply), &forked);
            for &m in &self.own_moves {
                if !guards.contains(&m) && self.prevents_fork(m, reply, &forked, answerable) {
                    guards.push(m);
                }
            }
        }
        if guards.is_empty() {
            return Ok(None);
        }
        self.choose(guards).map(Some)
    }

    /// Whether own move `m` disarms the opposing fork `reply`.
    ///
    /// `m` must not leave its own piece threatened. It then works if the
    /// fork can no longer be played, if the forking piece lands threatened,
    /// if none of the forked pieces is still threatened after the fork, or
    /// (when the fork is not already answerable) if a second own move then
    /// saves all of them.
    fn prevents_fork(&self, m: Move, reply: Move, forked: &[Square], answerable: bool) -> bool {
        let board = self.board();
        if exposes_mover(board, m) {
            return false;
        }
        let after = board.after(m);
        if !movegen::is_legal(&after, self.opp, reply) {
            return true;
        }
        let forked_now: Vec<Square> = forked
            .iter()
            .map(|&sq| if sq == m.from { m.to } else { sq })
            .collect();
        let replied = after.after(reply);
        if is_threatened(&replied, reply.to, self.opp) {
            return true;
        }
        if !self.any_hanging(&replied, &forked_now) {
            return true;
        }
        !answerable && self.answerable(&replied, &forked_now)
    }

    /// Whether some single own move leaves none of `forked` threatened.
    fn answerable(&self, board: &Board, forked: &[Square]) -> bool {
        movegen::legal_moves(board, self.me).into_iter().any(|m2| {
            if exposes_mover(board, m2) {
                return false;
            }
            let moved: Vec<Square> = forked
                .iter()
                .map(|&sq| if sq == m2.from { m2.to } else { sq })
                .collect();
            !self.any_hanging(&board.after(m2), &moved)
        })
    }

    fn any_hanging(&self, board: &Board, squares: &[Square]) -> bool {
        squares.iter().any(|&sq| {
            matches!(board.get(sq), Some(p) if p.team == self.me) && is_threatened(board, sq, self.me)
        })
    }

    fn fork_creation(&mut self) -> StageResult {
        let board = self.board();
        let rated: Vec<(Move, ForkSeverity)> = self
            .own_moves
            .iter()
            .copied()
            .filter(|&m| !exposes_mover(board, m))
            .map(|m| (m, fork_severity(board, m)))
            .collect();
        let top = rated
            .iter()
            .map(|&(_, s)| s)
            .max()
            .unwrap_or(ForkSeverity::None);
        if top == ForkSeverity::None {
            return Ok(None);
        }
        debug!("best fork available: {top:?}");
        let forks = rated
            .into_iter()
            .filter(|&(_, s)| s == top)
            .map(|(m, _)| m)
            .collect();
        self.choose(forks).map(Some)
    }

    fn blockade(&mut self) -> StageResult {
        let board = self.board();
        let opp = self.opp;
        let squeezes: Vec<Move> = self
            .own_moves
            .iter()
            .copied()
            .filter(|&m| !exposes_mover(board, m))
            .filter(|&m| delta_after_move(board, m, |b| blocked_count(b, opp)) > 0)
            .collect();
        if squeezes.is_empty() {
            return Ok(None);
        }
        self.choose(squeezes).map(Some)
    }

    fn fallback(&mut self) -> StageResult {
        let pruned: Vec<Move> = self
            .own_moves
            .iter()
            .copied()
            .filter(|&m| self.own_threat_delta(m) <= 0)
            .collect();
        let pool = if pruned.is_empty() {
            debug!("every move adds a threatened piece, considering all");
            self.own_moves.clone()
        } else {
            pruned
        };
        self.choose(pool).map(Some)
    }

    /// Best-effort choice after a stage fault.
    fn recover(&mut self) -> Option<Decision> {
        let pos = self.pos;
        let attempt = |candidates: &[Move]| {
            panic::catch_unwind(|| pick_best(pos, candidates))
                .ok()
                .and_then(Result::ok)
        };
        let last: Vec<Move> = self
            .last_candidates
            .iter()
            .copied()
            .filter(|m| self.own_moves.contains(m))
            .collect();
        let mv = attempt(&last)
            .or_else(|| attempt(&self.own_moves))
            .or_else(|| self.own_moves.first().copied())?;
        warn!("turn {}: recovered with {mv}", pos.turn);
        Some(Decision {
            mv,
            stage: Stage::Recovery,
            recovered: true,
        })
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn format_squares(squares: &[Square]) -> String {
    squares
        .iter()
        .map(Square::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn format_moves(moves: &[Move]) -> String {
    moves
        .iter()
        .map(Move::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
