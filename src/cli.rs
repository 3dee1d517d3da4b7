use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Terminal dashboard for a five-phase research project.
/// Data lives in ~/.volta, $VOLTA_DIR, or a directory passed via --data-dir.
#[derive(Parser)]
#[command(name = "volta", version, about = "Project Volta task and literature tracker")]
pub struct Cli {
    /// Directory holding the store, volta.toml and literature-db.json.
    #[arg(long, global = true, env = "VOLTA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Path to a configuration file (default: <data-dir>/volta.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
