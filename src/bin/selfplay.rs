//! Self-play game generation CLI.
//!
//! Plays the agent against itself and outputs game records as JSONL.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- [OPTIONS]
//!
//! Options:
//!   --games N       Number of games to play (default: 10)
//!   --threads N     Number of parallel threads (default: 4)
//!   --seed N        Random seed, 0 for entropy (default: 0)
//!   --variety T     Move sampling temperature (default: 0)
//!   --intercept     Intercept opponent breakthroughs
//!   --config FILE   Engine options JSON file
//!   --output FILE   Output file path (default: stdout)
//!   --quiet         Suppress summary output

use std::env;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use std::process;
use std::str::FromStr;
use std::time::Instant;

use log::{error, info};

use tidewatch::config::EngineOptions;
use tidewatch::selfplay::{self, SelfPlayConfig, Summary};

fn value<T: FromStr>(args: &[String], i: usize, flag: &str) -> T {
    match args.get(i).map(|s| s.parse::<T>()) {
        Some(Ok(v)) => v,
        _ => {
            eprintln!("invalid {} value", flag);
            print_usage();
            process::exit(2);
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let mut config = SelfPlayConfig::default();
    let mut output_path: Option<String> = None;
    let mut variety: Option<f64> = None;
    let mut intercept = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => {
                i += 1;
                config.num_games = value(&args, i, "--games");
            }
            "--threads" => {
                i += 1;
                config.threads = value(&args, i, "--threads");
            }
            "--seed" => {
                i += 1;
                config.seed = value(&args, i, "--seed");
            }
            "--variety" => {
                i += 1;
                variety = Some(value(&args, i, "--variety"));
            }
            "--intercept" => {
                intercept = true;
            }
            "--config" => {
                i += 1;
                let path: String = value(&args, i, "--config");
                config.options = match EngineOptions::load(Path::new(&path)) {
                    Ok(options) => options,
                    Err(e) => {
                        error!("{}", e);
                        process::exit(1);
                    }
                };
            }
            "--output" => {
                i += 1;
                output_path = Some(value(&args, i, "--output"));
            }
            "--quiet" => {
                config.quiet = true;
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                process::exit(2);
            }
        }
        i += 1;
    }

    if let Some(v) = variety {
        config.options.variety = v;
    }
    if intercept {
        config.options.intercept_breakthroughs = true;
    }

    info!(
        "self-play: {} games, {} threads, variety {:.2}, intercept {}",
        config.num_games,
        config.threads,
        config.options.variety,
        config.options.intercept_breakthroughs
    );

    let start = Instant::now();
    let games = match selfplay::run_self_play(&config) {
        Ok(games) => games,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };
    info!(
        "completed {} games in {:.1}s",
        games.len(),
        start.elapsed().as_secs_f64()
    );

    if !config.quiet {
        if let Err(e) = Summary::from_games(&games).report(&mut io::stderr()) {
            error!("{}", e);
        }
    }

    let written = match &output_path {
        Some(path) => File::create(path)
            .map_err(selfplay::SelfPlayError::from)
            .and_then(|file| selfplay::write_jsonl(&games, &mut BufWriter::new(file))),
        None => selfplay::write_jsonl(&games, &mut BufWriter::new(io::stdout().lock())),
    };
    match written {
        Ok(()) => {
            if let Some(path) = output_path {
                info!("wrote {} games to {}", games.len(), path);
            }
        }
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: selfplay [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N        Number of games to play (default: 10)");
    eprintln!("  --threads N      Number of parallel threads (default: 4)");
    eprintln!("  --seed N         Random seed, 0 for entropy (default: 0)");
    eprintln!("  --variety T      Move sampling temperature (default: 0)");
    eprintln!("  --intercept      Intercept opponent breakthroughs");
    eprintln!("  --config FILE    Engine options JSON file");
    eprintln!("  --output FILE    Output file path (default: stdout)");
    eprintln!("  --quiet          Suppress summary output");
    eprintln!("  --help           Show this help");
}
