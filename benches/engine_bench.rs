use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use tidewatch::board::Team;
use tidewatch::config::EngineOptions;
use tidewatch::movegen::legal_moves;
use tidewatch::protocol::parse_position;
use tidewatch::rules::{random_start, Position};
use tidewatch::search::Pipeline;
use tidewatch::tactics::{fork_severity, threatened_pieces};

/// A crowded middle-game position with contact between both sides.
const MIDGAME: &str = "14/1:0/0C12,0G23,0S34,0L31,0G44*2,0C05,0S06,\
                       1C53,1G54,1S45,1L62,1G66,1C71,1S77";

fn midgame() -> Position {
    parse_position(MIDGAME).unwrap()
}

fn bench_legal_moves(c: &mut Criterion) {
    let pos = midgame();
    c.bench_function("legal_moves_midgame", |b| {
        b.iter(|| legal_moves(black_box(&pos.board), black_box(Team::One)))
    });
}

fn bench_threatened(c: &mut Criterion) {
    let pos = midgame();
    c.bench_function("threatened_pieces_midgame", |b| {
        b.iter(|| threatened_pieces(black_box(&pos.board), black_box(Team::One)))
    });
}

fn bench_fork_scan(c: &mut Criterion) {
    let pos = midgame();
    let moves = legal_moves(&pos.board, Team::One);
    c.bench_function("fork_severity_all_moves", |b| {
        b.iter(|| {
            moves
                .iter()
                .map(|&m| fork_severity(black_box(&pos.board), m))
                .max()
        })
    });
}

fn bench_select_opening(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(1);
    let pos = random_start(&mut rng);
    let options = EngineOptions::default();
    c.bench_function("select_move_opening", |b| {
        b.iter(|| Pipeline::new(black_box(&pos), &options).select())
    });
}

fn bench_select_midgame(c: &mut Criterion) {
    let pos = midgame();
    let options = EngineOptions::default();
    c.bench_function("select_move_midgame", |b| {
        b.iter(|| Pipeline::new(black_box(&pos), &options).select())
    });
}

criterion_group!(
    benches,
    bench_legal_moves,
    bench_threatened,
    bench_fork_scan,
    bench_select_opening,
    bench_select_midgame,
);
criterion_main!(benches);
