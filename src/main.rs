//! Tidewatch -- a tactical Ostseeschach agent speaking a line protocol.
//!
//! This binary reads commands from stdin and writes responses to stdout.
//! Logging goes to stderr and is filtered with `RUST_LOG`.
//!
//! Usage:
//!   tidewatch [--config FILE]

use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use log::{error, info, warn};

use tidewatch::config::EngineOptions;
use tidewatch::engine::Engine;
use tidewatch::protocol::parser::{parse_command, Command};

fn parse_args() -> Option<PathBuf> {
    let mut args = env::args().skip(1);
    let mut config = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => match args.next() {
                Some(path) => config = Some(PathBuf::from(path)),
                None => {
                    eprintln!("--config needs a file path");
                    process::exit(2);
                }
            },
            "--help" | "-h" => {
                eprintln!("Usage: tidewatch [--config FILE]");
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Usage: tidewatch [--config FILE]");
                process::exit(2);
            }
        }
    }
    config
}

/// Runs the protocol loop until `quit` or end of input.
fn run<R: BufRead, W: Write>(engine: &mut Engine, input: R, out: &mut W) -> io::Result<()> {
    for line in input.lines() {
        let Some(cmd) = parse_command(&line?) else {
            continue;
        };

        match cmd {
            Command::Hello => engine.handle_hello(out)?,
            Command::IsReady => engine.handle_isready(out)?,
            Command::SetOption { name, value } => {
                if let Err(e) = engine.set_option(&name, value.as_deref()) {
                    warn!("{}", e);
                }
            }
            Command::NewGame => engine.new_game(),
            Command::Position { notation } => {
                if let Err(e) = engine.set_position(&notation) {
                    warn!("rejected position '{}': {}", notation, e);
                }
            }
            Command::Go => engine.handle_go(out)?,
            Command::Quit => break,
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let options = match parse_args() {
        Some(path) => match EngineOptions::load(&path) {
            Ok(options) => {
                info!("loaded options from {}", path.display());
                options
            }
            Err(e) => {
                error!("{}", e);
                process::exit(1);
            }
        },
        None => EngineOptions::default(),
    };

    let mut engine = Engine::with_options(options);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    if let Err(e) = run(&mut engine, stdin.lock(), &mut out) {
        error!("protocol i/o failed: {}", e);
        process::exit(1);
    }
}
