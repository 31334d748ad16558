//! Command implementations for the CLI interface.
//!
//! The interactive UI is the main surface; the only other command prints
//! shell completions.

use clap::Subcommand;
use clap_complete::{generate, Shell};
use tracing::info;

use crate::config::UiConfig;
use crate::error::AppError;
use crate::fields::*;
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI (the default).
    Ui {
        /// Initial filter: all | pending | completed | urgent.
        #[arg(long, value_enum, default_value_t = Filter::All)]
        filter: Filter,
        /// Initial sort: created | due-date | priority | category.
        #[arg(long, value_enum, default_value_t = SortKey::Created)]
        sort: SortKey,
        /// Colour theme: light | dark.
        #[arg(long, value_enum, default_value_t = Theme::Light)]
        theme: Theme,
        /// Category preselected for new tasks.
        #[arg(long, value_enum, default_value_t = Category::Personal)]
        category: Category,
        /// Priority preselected for new tasks: low | medium | high.
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// UI refresh interval in milliseconds.
        #[arg(long, default_value_t = 50)]
        tick_ms: u64,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the interactive task list.
pub fn cmd_ui(
    filter: Filter,
    sort: SortKey,
    theme: Theme,
    category: Category,
    priority: Priority,
    tick_ms: u64,
) -> Result<(), AppError> {
    let config = UiConfig::new(filter, sort, theme, category, priority, tick_ms)?;
    info!(?config, "starting ui");
    run_tui(config)?;
    info!("ui closed");
    Ok(())
}

/// Generate shell completions for the specified shell.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
