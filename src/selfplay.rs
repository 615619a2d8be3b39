//! Self-play game generation.
//!
//! Plays full games of the agent against itself from random start
//! positions and records every turn: the position notation, the chosen move
//! and the pipeline stage that chose it. Games can run in parallel on a
//! rayon pool; records are written as JSON lines.

use std::io::{self, Write};
use std::time::Instant;

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::board::Team;
use crate::config::EngineOptions;
use crate::eval::WeightedSampler;
use crate::protocol::notation::encode_position;
use crate::rules::{random_start, Position};
use crate::search::{Pipeline, Stage};

/// Errors from a self-play run.
#[derive(Debug, Error)]
pub enum SelfPlayError {
    #[error("cannot build thread pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    #[error("cannot write games: {0}")]
    Io(#[from] io::Error),
    #[error("cannot encode game: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for self-play game generation.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Number of parallel threads; 1 plays games one after another.
    pub threads: usize,
    /// Base random seed (0 = use entropy). Game `i` uses `seed + i`.
    pub seed: u64,
    /// Options used by both sides.
    pub options: EngineOptions,
    /// Suppress per-game progress logging.
    pub quiet: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            threads: 4,
            seed: 0,
            options: EngineOptions::default(),
            quiet: false,
        }
    }
}

/// A single recorded turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnRecord {
    pub turn: u32,
    /// Position notation before the move.
    pub position: String,
    pub team: Team,
    #[serde(rename = "move")]
    pub mv: String,
    pub stage: Stage,
    pub recovered: bool,
}

/// A complete self-play game record.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub game_id: usize,
    pub turns: Vec<TurnRecord>,
    /// `None` for a draw.
    pub winner: Option<Team>,
    pub ambers: [u8; 2],
    /// Notation of the final position.
    pub final_position: String,
}

fn game_rng(seed: u64, game_id: usize) -> SmallRng {
    if seed != 0 {
        SmallRng::seed_from_u64(seed.wrapping_add(game_id as u64))
    } else {
        SmallRng::from_entropy()
    }
}

/// Plays one game to the end from a random start.
pub fn play_game(options: &EngineOptions, game_id: usize, rng: &mut SmallRng) -> GameRecord {
    let mut pos: Position = random_start(rng);
    let mut turns = Vec::new();

    while !pos.is_game_over() {
        let pipeline = Pipeline::new(&pos, options);
        let decision = if options.variety > 0.0 {
            pipeline
                .with_sampler(WeightedSampler::new(options.variety), rng)
                .select()
        } else {
            pipeline.select()
        };
        let Some(decision) = decision else {
            break;
        };
        debug!("game {game_id} turn {}: {} ({})", pos.turn, decision.mv, decision.stage);
        turns.push(TurnRecord {
            turn: pos.turn,
            position: encode_position(&pos),
            team: pos.current_team(),
            mv: decision.mv.to_string(),
            stage: decision.stage,
            recovered: decision.recovered,
        });
        pos = pos.simulate(decision.mv);
    }

    GameRecord {
        game_id,
        turns,
        winner: pos.winner(),
        ambers: pos.ambers,
        final_position: encode_position(&pos),
    }
}

fn play_logged(config: &SelfPlayConfig, game_id: usize) -> GameRecord {
    let start = Instant::now();
    let mut rng = game_rng(config.seed, game_id);
    let game = play_game(&config.options, game_id, &mut rng);
    if !config.quiet {
        info!(
            "game {}/{}: {} after {} turns, ambers {}:{} ({:.2}s)",
            game_id + 1,
            config.num_games,
            outcome(game.winner),
            game.turns.len(),
            game.ambers[0],
            game.ambers[1],
            start.elapsed().as_secs_f64()
        );
    }
    game
}

/// Runs self-play generation, returning records ordered by game id.
///
/// When `config.threads > 1`, games are played concurrently using rayon.
pub fn run_self_play(config: &SelfPlayConfig) -> Result<Vec<GameRecord>, SelfPlayError> {
    if config.threads <= 1 {
        return Ok((0..config.num_games)
            .map(|i| play_logged(config, i))
            .collect());
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;
    Ok(pool.install(|| {
        (0..config.num_games)
            .into_par_iter()
            .map(|i| play_logged(config, i))
            .collect()
    }))
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> Result<(), SelfPlayError> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

fn outcome(winner: Option<Team>) -> &'static str {
    match winner {
        Some(Team::One) => "team one wins",
        Some(Team::Two) => "team two wins",
        None => "draw",
    }
}

/// Win, draw and stage counts over a set of games.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub games: usize,
    pub wins: [usize; 2],
    pub draws: usize,
    pub turns: usize,
    pub recovered: usize,
    /// Moves chosen per stage, indexed by `Stage::number() - 1`.
    pub by_stage: [usize; 11],
}

impl Summary {
    pub fn from_games(games: &[GameRecord]) -> Self {
        let mut summary = Summary {
            games: games.len(),
            ..Summary::default()
        };
        for game in games {
            match game.winner {
                Some(team) => summary.wins[team.index()] += 1,
                None => summary.draws += 1,
            }
            summary.turns += game.turns.len();
            for turn in &game.turns {
                summary.by_stage[turn.stage.number() as usize - 1] += 1;
                if turn.recovered {
                    summary.recovered += 1;
                }
            }
        }
        summary
    }

    /// Writes a human-readable report.
    pub fn report<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let games = self.games.max(1) as f64;
        writeln!(out, "=== Self-Play Summary ===")?;
        writeln!(out, "Games: {}", self.games)?;
        writeln!(out, "Avg turns/game: {:.1}", self.turns as f64 / games)?;
        writeln!(
            out,
            "Team one: {} ({:.1}%)",
            self.wins[0],
            100.0 * self.wins[0] as f64 / games
        )?;
        writeln!(
            out,
            "Team two: {} ({:.1}%)",
            self.wins[1],
            100.0 * self.wins[1] as f64 / games
        )?;
        writeln!(out, "Draws: {}", self.draws)?;
        writeln!(out, "Recovered decisions: {}", self.recovered)?;
        writeln!(out, "Moves by stage:")?;
        for (i, count) in self.by_stage.iter().enumerate() {
            if *count > 0 {
                writeln!(out, "  {:>2}: {}", i + 1, count)?;
            }
        }
        Ok(())
    }
}
