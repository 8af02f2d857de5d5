//! `kubectl create limitrange` / `kubectl lr`
//!
//! Builds a single LimitRange from command-line flags and either creates it,
//! prints it (`--dry-run=client`), or submits it for server-side validation
//! and prints the result (`--dry-run=server`).

pub mod cli;
pub mod run;

pub use cli::{Cli, LimitRangeCommand, execute, main_with};
pub use run::run;
