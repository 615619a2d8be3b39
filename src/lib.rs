//! Tidewatch engine library.
//!
//! Exposes the board and rules, tactical analysis, move scoring, the
//! decision pipeline, and protocol modules for use by integration tests
//! and the binaries.

pub mod board;
pub mod config;
pub mod engine;
pub mod eval;
pub mod movegen;
pub mod protocol;
pub mod rules;
pub mod search;
pub mod selfplay;
pub mod tactics;
