//! Command line interface for condaci.
//!
//! Parses arguments, snapshots the environment and dispatches to the
//! per-step executors.

mod args;
pub mod commands;
mod output;

pub use args::{
    Args, BinstarArgs, BuildPathArgs, Command, MinicondaArgs, PypiArgs, RuntimeConfig,
};
pub use commands::execute_command;
pub use output::OutputManager;

use crate::error::Result;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute_command(args).await
}
