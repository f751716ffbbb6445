//! # tb - project board
//!
//! A file-backed project board: projects hold tasks, tasks sit in one of
//! three status columns (Pending, In Progress, Complete) and carry an
//! optional assignee, a due date, category labels and a subtask checklist.
//!
//! ## Quick Start
//!
//! ```bash
//! # Create a project and a category
//! tb project-add "Website Redesign"
//! tb category-add Frontend "#0ea5e9"
//!
//! # Add a task and list the project grouped by status
//! tb add website-redesign-k3x9qa "Build nav bar" --category cat-... --due fri
//! tb tasks website-redesign-k3x9qa
//!
//! # Move a task to another column, before a given task
//! tb move task-... in-progress --before task-...
//!
//! # Drag cards around interactively
//! tb board website-redesign-k3x9qa
//! ```
//!
//! ## Storage
//!
//! Everything lives in one JSON document (`~/.taskboard/db.json` by default,
//! `--db` or `TASKBOARD_DB` to override) with `projects`, `tasks` and
//! `categories` collections. Each command re-reads the document and each
//! change rewrites it in full. Order within a column is persisted through a
//! per-task `rank`.
//!
//! Set `RUST_LOG=taskboard=debug` to see what the store is doing.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod board;
pub mod category;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod dates;
pub mod db;
pub mod error;
pub mod fields;
pub mod ids;
pub mod project;
pub mod render;
pub mod reorder;
pub mod task;
pub mod tui {
    pub mod board;
    pub mod colors;
    pub mod run;
}

use cli::Cli;
use config::StoreConfig;
use db::Store;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let config = StoreConfig::resolve(cli.db.as_deref(), cli.strict);
    let store = match Store::open(config) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = cmd::run(&store, cli.command) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
