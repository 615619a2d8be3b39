//! Engine session state.
//!
//! Holds the position for the current turn, the engine options, and the
//! RNG used when move sampling is enabled. The protocol loop installs a
//! position with `position` and asks for a move with `go`.

use std::io::{self, Write};

use log::{info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::{ConfigError, EngineOptions};
use crate::eval::WeightedSampler;
use crate::protocol::notation::{parse_position, NotationError};
use crate::rules::Position;
use crate::search::{Decision, Pipeline};

/// Holds the mutable state of the engine between commands.
pub struct Engine {
    pub position: Option<Position>,
    pub options: EngineOptions,
    rng: SmallRng,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates an engine with default options and no position.
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    pub fn with_options(options: EngineOptions) -> Self {
        let rng = seeded_rng(options.seed);
        Engine {
            position: None,
            options,
            rng,
        }
    }

    /// Forgets the current position.
    pub fn new_game(&mut self) {
        self.position = None;
    }

    /// Installs the position for the coming turn.
    pub fn on_turn_start(&mut self, position: Position) {
        info!(
            "turn {}: {:?} to move, ambers {}:{}",
            position.turn,
            position.current_team(),
            position.ambers[0],
            position.ambers[1]
        );
        self.position = Some(position);
    }

    /// Parses and installs a position. The previous position is kept if
    /// the notation is malformed.
    pub fn set_position(&mut self, notation: &str) -> Result<(), NotationError> {
        let position = parse_position(notation)?;
        self.on_turn_start(position);
        Ok(())
    }

    /// Sets one engine option by name. Changing the seed reseeds sampling.
    pub fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), ConfigError> {
        self.options.set(name, value)?;
        if name.eq_ignore_ascii_case("seed") {
            self.rng = seeded_rng(self.options.seed);
        }
        Ok(())
    }

    /// Chooses a move for the team to move in the current position.
    ///
    /// Returns `None` when no position is installed or the team to move has
    /// no legal move.
    pub fn select_move(&mut self) -> Option<Decision> {
        let Some(position) = self.position.as_ref() else {
            warn!("no position set");
            return None;
        };
        let pipeline = Pipeline::new(position, &self.options);
        if self.options.variety > 0.0 {
            pipeline
                .with_sampler(WeightedSampler::new(self.options.variety), &mut self.rng)
                .select()
        } else {
            pipeline.select()
        }
    }

    /// Handles the handshake: writes id, option declarations, and `hellook`.
    pub fn handle_hello<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "id name tidewatch {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(out, "id author tidewatch")?;
        for line in EngineOptions::declarations() {
            writeln!(out, "{}", line)?;
        }
        writeln!(out, "hellook")?;
        out.flush()
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")?;
        out.flush()
    }

    /// Handles the `go` command: reports the deciding stage, then the move.
    pub fn handle_go<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        match self.select_move() {
            Some(decision) => {
                writeln!(
                    out,
                    "info stage {} {}{}",
                    decision.stage.number(),
                    decision.stage,
                    if decision.recovered { " recovered" } else { "" }
                )?;
                writeln!(out, "bestmove {}", decision.mv)?;
            }
            None => writeln!(out, "bestmove none")?,
        }
        out.flush()
    }
}

fn seeded_rng(seed: u64) -> SmallRng {
    if seed == 0 {
        SmallRng::from_entropy()
    } else {
        SmallRng::seed_from_u64(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen;
    use crate::protocol::notation::parse_move;
    use crate::search::Stage;

    const OPENING: &str = "0/0:0/0C00,0G01,0S02,0L03,0C04,0G05,0S06,0L07,\
                           1C70,1G71,1S72,1L73,1C74,1G75,1S76,1L77";

    fn output_of<F: FnOnce(&mut Vec<u8>) -> io::Result<()>>(f: F) -> String {
        let mut output = Vec::new();
        f(&mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn new_engine_has_no_state() {
        let engine = Engine::new();
        assert!(engine.position.is_none());
        assert_eq!(engine.options, EngineOptions::default());
    }

    #[test]
    fn new_game_resets_position() {
        let mut engine = Engine::new();
        engine.set_position(OPENING).unwrap();
        engine.new_game();
        assert!(engine.position.is_none());
    }

    #[test]
    fn set_position_valid_notation() {
        let mut engine = Engine::new();
        assert!(engine.set_position(OPENING).is_ok());
        let pos = engine.position.as_ref().unwrap();
        assert_eq!(pos.turn, 0);
        assert_eq!(pos.board.pieces().count(), 16);
    }

    #[test]
    fn set_position_invalid_keeps_previous() {
        let mut engine = Engine::new();
        engine.set_position(OPENING).unwrap();
        assert!(engine.set_position("garbage").is_err());
        assert_eq!(engine.position.unwrap().board.pieces().count(), 16);
    }

    #[test]
    fn set_option_updates_options() {
        let mut engine = Engine::new();
        engine.set_option("Variety", Some("1.5")).unwrap();
        engine.set_option("Seed", Some("3")).unwrap();
        assert_eq!(engine.options.variety, 1.5);
        assert_eq!(engine.options.seed, 3);
        assert!(engine.set_option("Threads", Some("8")).is_err());
    }

    #[test]
    fn select_move_without_position_is_none() {
        assert!(Engine::new().select_move().is_none());
    }

    #[test]
    fn select_move_returns_legal_opening_move() {
        let mut engine = Engine::new();
        engine.set_position(OPENING).unwrap();
        let decision = engine.select_move().unwrap();
        let pos = engine.position.unwrap();
        assert!(movegen::is_legal(&pos.board, pos.current_team(), decision.mv));
        assert!(!decision.recovered);
    }

    #[test]
    fn seeded_sampling_is_repeatable() {
        let pick = || {
            let mut engine = Engine::with_options(EngineOptions {
                variety: 2.0,
                seed: 11,
                ..EngineOptions::default()
            });
            engine.set_position(OPENING).unwrap();
            engine.select_move().unwrap().mv
        };
        assert_eq!(pick(), pick());
    }

    #[test]
    fn handle_go_outputs_bestmove() {
        let mut engine = Engine::new();
        engine.set_position("0/1:0/0C63,1G77").unwrap();
        let output = output_of(|out| engine.handle_go(out));
        assert!(output.contains(&format!("info stage 1 {}", Stage::ImmediateWin)));
        let line = output.lines().find(|l| l.starts_with("bestmove ")).unwrap();
        let mv = parse_move(line.strip_prefix("bestmove ").unwrap()).unwrap();
        assert_eq!(mv.to_string(), "63-74");
    }

    #[test]
    fn handle_go_without_moves_says_none() {
        let mut engine = Engine::new();
        engine.set_position("0/0:0/1G77").unwrap();
        let output = output_of(|out| engine.handle_go(out));
        assert_eq!(output.trim(), "bestmove none");
    }

    #[test]
    fn handle_hello_outputs_handshake() {
        let engine = Engine::new();
        let output = output_of(|out| engine.handle_hello(out));
        assert!(output.starts_with("id name tidewatch"));
        assert!(output.contains("id author tidewatch"));
        assert!(output.contains("option name Variety"));
        assert!(output.contains("option name InterceptBreakthroughs"));
        assert_eq!(output.lines().last(), Some("hellook"));
    }

    #[test]
    fn handle_isready_outputs_readyok() {
        let engine = Engine::new();
        let output = output_of(|out| engine.handle_isready(out));
        assert_eq!(output.trim(), "readyok");
    }
}
