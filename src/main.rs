//! # Volta - Project Tracking Dashboard
//!
//! A terminal dashboard for a five-phase research project: tasks bucketed by
//! phase, a literature database with citations, and progress summaries, with
//! a CLI for scripting and an interactive TUI.
//!
//! ## Quick Start
//!
//! ```bash
//! # Summary of progress, urgent tasks and the phase timeline
//! volta dashboard
//!
//! # Launch the TUI on the literature screen
//! volta ui --screen literature
//!
//! # Add a task and complete it
//! volta task add "Draft policy section" --phase III --due "in 5d"
//! volta task complete 4
//!
//! # Search the literature and print a citation
//! volta lit list --search battery --filter recent
//! volta lit cite 1
//! ```
//!
//! ## Key Commands
//!
//! - `volta dashboard [--export]` - Progress overview or JSON snapshot
//! - `volta task list|add|edit|view|complete|delete|export|import`
//! - `volta lit list|add|edit|view|cite|save|delete|stats|export|import`
//! - `volta ui` - Interactive dashboard, task board and literature browser
//!
//! Data is stored in `~/.volta/` (or `$VOLTA_DIR`, or `--data-dir`) as one JSON
//! file per collection, with optional settings in `volta.toml`.

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub mod citation;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod fields;
pub mod literature;
pub mod modal;
pub mod project;
pub mod query;
pub mod store;
pub mod task;
pub mod transfer;
pub mod tui {
    pub mod app;
    pub mod board;
    pub mod colors;
    pub mod dashboard_view;
    pub mod enums;
    pub mod input;
    pub mod literature_form;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use error::Result;
use project::{resolve_data_dir, Project};

/// Log to stderr so command output stays clean. `RUST_LOG` overrides the flag.
fn init_tracing(verbose: bool) {
    let default = if verbose { "volta=debug" } else { "volta=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    // Completions need no data directory.
    if let Commands::Completions { shell } = cli.command {
        cmd_completions(shell);
        return Ok(());
    }

    let data_dir = resolve_data_dir(cli.data_dir.as_deref());
    let mut project = Project::open(&data_dir, cli.config.as_deref())?;

    match cli.command {
        Commands::Dashboard { export } => cmd_dashboard(&mut project, export),
        Commands::Task { action } => cmd_task(&mut project, action),
        Commands::Lit { action } => cmd_lit(&mut project, action),
        Commands::Ui { screen } => cmd_ui(project, screen),
        Commands::Completions { .. } => unreachable!("completions handled above"),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
