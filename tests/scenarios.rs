//! End-to-end decision scenarios.
//!
//! Each fixture is built so that exactly one pipeline stage should answer,
//! and checks both the move and the stage that produced it.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use tidewatch::board::{Move, Square, Team};
use tidewatch::config::EngineOptions;
use tidewatch::eval::pick_best;
use tidewatch::movegen;
use tidewatch::protocol::parse_position;
use tidewatch::rules::{random_start, Position};
use tidewatch::search::{Decision, Fault, Pipeline, Stage};
use tidewatch::tactics::{
    delta_after_move, is_opponent, is_own, is_tower, threatened_count, threatened_pieces,
};

fn mv(from: (u8, u8), to: (u8, u8)) -> Move {
    Move::new(Square::new(from.0, from.1), Square::new(to.0, to.1))
}

fn decide(pos: &Position) -> Decision {
    Pipeline::new(pos, &EngineOptions::default())
        .select()
        .expect("position has legal moves")
}

/// One gull on 53 with every step landing next to an undefended opposing
/// gull. Nothing is threatened yet and nothing can be captured.
const ALL_MOVES_EXPOSE: &str = "0/0:0/0G53,1G64,1G42";

#[test]
fn scenario_a_counter_capture_defends() {
    let pos = parse_position("0/0:0/0G33,0C00,1G43,1G77").unwrap();
    assert_eq!(threatened_pieces(&pos.board, Team::One), vec![Square::new(3, 3)]);

    let d = decide(&pos);
    assert_eq!(d.stage, Stage::Defense);
    assert_eq!(d.mv, mv((3, 3), (4, 3)));
    assert_eq!(threatened_count(&pos.board.after(d.mv), Team::One), 0);
}

#[test]
fn scenario_b_single_scoring_move() {
    // The seal on the far column blocks the cockle's other diagonal.
    let pos = parse_position("0/0:0/0C63,0L72,1G77").unwrap();
    assert!(threatened_pieces(&pos.board, Team::One).is_empty());

    let d = decide(&pos);
    assert_eq!(d.stage, Stage::Scoring);
    assert_eq!(d.mv, mv((6, 3), (7, 4)));
}

#[test]
fn scenario_c_everything_exposes_so_fallback_uses_all_moves() {
    let pos = parse_position(ALL_MOVES_EXPOSE).unwrap();
    let moves = pos.legal_moves(Team::One);
    assert_eq!(moves.len(), 4);
    for &m in &moves {
        assert_eq!(delta_after_move(&pos.board, m, |b| threatened_count(b, Team::One)), 1);
    }

    let d = decide(&pos);
    assert_eq!(d.stage, Stage::Fallback);
    assert!(!d.recovered);
    assert_eq!(Ok(d.mv), pick_best(&pos, &moves));
}

#[test]
fn scenario_d_fault_in_fork_prevention_is_recovered() {
    let pos = parse_position(ALL_MOVES_EXPOSE).unwrap();
    for fault in [Fault::Error, Fault::Panic] {
        let d = Pipeline::new(&pos, &EngineOptions::default())
            .inject_fault(Stage::ForkPrevention, fault)
            .select()
            .expect("recovery returns a move");
        assert!(d.recovered);
        assert_eq!(d.stage, Stage::Recovery);
        assert!(movegen::is_legal(&pos.board, Team::One, d.mv));
    }
}

#[test]
fn every_stage_fault_still_yields_a_legal_move() {
    let mut rng = SmallRng::seed_from_u64(2024);
    let pos = random_start(&mut rng);
    let stages = [
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
    for stage in stages {
        let d = Pipeline::new(&pos, &EngineOptions::default())
            .inject_fault(stage, Fault::Error)
            .select()
            .unwrap();
        assert!(movegen::is_legal(&pos.board, pos.current_team(), d.mv));
    }
}

#[test]
fn empty_squares_answer_false() {
    let mut rng = SmallRng::seed_from_u64(8);
    let pos = random_start(&mut rng);
    for sq in Square::all().filter(|&sq| pos.board.get(sq).is_none()) {
        for team in [Team::One, Team::Two] {
            assert!(!is_own(&pos.board, sq, team));
            assert!(!is_opponent(&pos.board, sq, team));
        }
        assert!(!is_tower(&pos.board, sq));
    }
}

#[test]
fn analysis_never_mutates_the_position() {
    let mut rng = SmallRng::seed_from_u64(31);
    let mut pos = random_start(&mut rng);
    for _ in 0..12 {
        if pos.is_game_over() {
            break;
        }
        let snapshot = pos;
        for m in pos.legal_moves(pos.current_team()) {
            delta_after_move(&pos.board, m, |b| threatened_count(b, Team::One));
        }
        let Some(d) = Pipeline::new(&pos, &EngineOptions::default()).select() else {
            break;
        };
        assert_eq!(pos, snapshot);
        pos = pos.simulate(d.mv);
    }
}

#[test]
fn decisions_are_repeatable() {
    let mut rng = SmallRng::seed_from_u64(77);
    let pos = random_start(&mut rng);
    assert_eq!(decide(&pos), decide(&pos));
}
