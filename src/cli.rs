use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;
use crate::config::{DB_ENV, STRICT_ENV};

/// File-backed project board.
/// Storage defaults to ~/.taskboard/db.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "tb", version, about = "Project board with kanban reordering")]
pub struct Cli {
    /// Path to the JSON document.
    #[arg(long, global = true, env = DB_ENV)]
    pub db: Option<PathBuf>,

    /// Refuse to continue when the document cannot be read, instead of
    /// treating it as empty.
    #[arg(long, global = true, env = STRICT_ENV)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Commands,
}
