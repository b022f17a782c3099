//! `walkin` command line: argument parsing, command handlers, table output.

pub mod args;
pub mod commands;
pub mod render;

pub use args::{Cli, Command};
pub use commands::{App, Outcome, run};
