use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::cmd::Commands;

/// Motivational in-memory to-do list.
/// Tasks live for the session only; nothing is written to disk.
#[derive(Parser)]
#[command(name = "taskmaster", version, about = "TaskMaster Pro - conquer your day in the terminal")]
pub struct Cli {
    /// Append logs to this file (the UI owns the terminal, so there is no console log).
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity. May be repeated.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
