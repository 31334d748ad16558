//! # TaskMaster Pro
//!
//! A motivational to-do list for the terminal. Tasks are added, edited,
//! completed, filtered, sorted and deleted in a single screen, with a
//! progress bar, quote popups, confetti and a typewriter tagline to keep
//! the momentum going.
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the UI
//! taskmaster
//!
//! # Start in dark mode showing only pending tasks, due soonest first
//! taskmaster ui --theme dark --filter pending --sort due-date
//!
//! # Keep a debug log while using the UI
//! taskmaster -v --log-file /tmp/taskmaster.log
//! ```
//!
//! ## Key Bindings
//!
//! - `a` - add a task (Tab moves between text, category, due date and priority)
//! - `space` - toggle completion
//! - `e` / `d` - edit / delete the selected task
//! - `f` / `s` - cycle filter / sort order
//! - `t` - toggle light and dark theme
//! - `h` - help
//!
//! Tasks live in memory for the session only. Nothing is written to disk.

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod config;
pub mod dates;
pub mod error;
pub mod feedback;
pub mod fields;
pub mod logging;
pub mod store;
pub mod task;
pub mod view;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use config::UiConfig;
use error::AppError;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    if let Some(path) = cli.log_file.as_deref() {
        logging::init_tracing(path, cli.verbose)?;
    }

    match cli.command {
        Some(Commands::Ui { filter, sort, theme, category, priority, tick_ms }) =>
            cmd_ui(filter, sort, theme, category, priority, tick_ms),

        Some(Commands::Completions { shell }) => {
            cmd_completions(shell);
            Ok(())
        }

        None => {
            let d = UiConfig::default();
            cmd_ui(d.filter, d.sort, d.theme, d.category, d.priority, d.tick_rate.as_millis() as u64)
        }
    }
}
