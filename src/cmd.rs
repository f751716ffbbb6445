//! Command implementations for the CLI interface.
//!
//! Each handler takes the opened store, performs one operation and prints
//! the result. Errors are returned to `main`, which reports them.

use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::board::BoardState;
use crate::category::Category;
use crate::cli::Cli;
use crate::dates::due_from_input;
use crate::db::Store;
use crate::error::{Result, StoreError};
use crate::fields::Status;
use crate::render::*;
use crate::reorder::DragSession;
use crate::task::{Subtask, TaskDraft, User};
use crate::tui::run::run_board_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// List projects.
    Projects,

    /// Create a project.
    ProjectAdd {
        /// Project name.
        name: String,
    },

    /// Show one project with per-column task counts.
    Project {
        /// Project id.
        id: String,
    },

    /// List a project's tasks grouped by status.
    Tasks {
        /// Project id.
        project: String,
        /// Only show this status.
        #[arg(long, value_enum)]
        status: Option<Status>,
    },

    /// Show a single task.
    Show {
        /// Task id.
        id: String,
    },

    /// Add a task to a project.
    Add {
        /// Project id.
        project: String,
        /// Short title for the task.
        title: String,
        /// Longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Starting column.
        #[arg(long, value_enum, default_value_t = Status::Pending)]
        status: Status,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "fri" or "in Nd".
        #[arg(long)]
        due: Option<String>,
        /// Assignee name.
        #[arg(long)]
        assignee: Option<String>,
        /// Category id. May be repeated.
        #[arg(long = "category")]
        categories: Vec<String>,
        /// Subtask text. May be repeated.
        #[arg(long = "subtask")]
        subtasks: Vec<String>,
    },

    /// Update fields on a task.
    Update {
        /// Task id.
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long, value_enum)]
        status: Option<Status>,
        #[arg(long)]
        due: Option<String>,
        /// Clear the due date.
        #[arg(long)]
        clear_due: bool,
        #[arg(long)]
        assignee: Option<String>,
        /// Clear the assignee.
        #[arg(long)]
        clear_assignee: bool,
    },

    /// Move a task to a column, optionally before another task.
    Move {
        /// Task id to move.
        id: String,
        /// Destination column.
        #[arg(value_enum)]
        status: Status,
        /// Place the task immediately before this task.
        #[arg(long)]
        before: Option<String>,
    },

    /// Manage subtasks.
    Subtask {
        #[command(subcommand)]
        action: SubtaskAction,
    },

    /// List categories.
    Categories,

    /// Create a category.
    CategoryAdd {
        name: String,
        /// Color, e.g. "#0ea5e9".
        color: String,
    },

    /// Delete a category and remove it from every task.
    CategoryRm {
        /// Category id.
        id: String,
    },

    /// Open the interactive board for a project.
    Board {
        /// Project id.
        project: String,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum SubtaskAction {
    /// Append a subtask to a task.
    Add { task: String, text: String },
    /// Mark a subtask completed.
    Done { task: String, subtask: String },
    /// Mark a subtask not completed.
    Undo { task: String, subtask: String },
}

/// Dispatch a parsed command.
pub fn run(store: &Store, command: Commands) -> Result<()> {
    match command {
        Commands::Projects => cmd_projects(store),
        Commands::ProjectAdd { name } => cmd_project_add(store, &name),
        Commands::Project { id } => cmd_project(store, &id),
        Commands::Tasks { project, status } => cmd_tasks(store, &project, status),
        Commands::Show { id } => cmd_show(store, &id),
        Commands::Add {
            project,
            title,
            desc,
            status,
            due,
            assignee,
            categories,
            subtasks,
        } => cmd_add(
            store,
            project,
            title,
            desc,
            status,
            due,
            assignee,
            categories,
            subtasks,
        ),
        Commands::Update {
            id,
            title,
            desc,
            status,
            due,
            clear_due,
            assignee,
            clear_assignee,
        } => cmd_update(
            store,
            &id,
            title,
            desc,
            status,
            due,
            clear_due,
            assignee,
            clear_assignee,
        ),
        Commands::Move { id, status, before } => cmd_move(store, &id, status, before.as_deref()),
        Commands::Subtask { action } => cmd_subtask(store, action),
        Commands::Categories => cmd_categories(store),
        Commands::CategoryAdd { name, color } => cmd_category_add(store, &name, &color),
        Commands::CategoryRm { id } => cmd_category_rm(store, &id),
        Commands::Board { project } => cmd_board(store, &project),
        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    }
}

pub fn cmd_projects(store: &Store) -> Result<()> {
    print_projects(&store.get_projects()?);
    Ok(())
}

pub fn cmd_project_add(store: &Store, name: &str) -> Result<()> {
    let project = store.create_project(name.trim())?;
    println!("Created project {} ({})", project.name, project.id);
    Ok(())
}

pub fn cmd_project(store: &Store, id: &str) -> Result<()> {
    let project = require_project(store, id)?;
    let board = BoardState::load(store, &project.id)?;
    print_project(&project, &board);
    Ok(())
}

pub fn cmd_tasks(store: &Store, project: &str, status: Option<Status>) -> Result<()> {
    let project = require_project(store, project)?;
    let board = BoardState::load(store, &project.id)?;
    println!("{}", project.name);
    println!();
    print_grouped(&board, status);
    Ok(())
}

pub fn cmd_show(store: &Store, id: &str) -> Result<()> {
    let task = store
        .get_task(id)?
        .ok_or_else(|| StoreError::task_not_found(id))?;
    print_task(&task);
    Ok(())
}

/// Add a new task. Categories are looked up and embedded by value.
#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    store: &Store,
    project: String,
    title: String,
    desc: Option<String>,
    status: Status,
    due: Option<String>,
    assignee: Option<String>,
    categories: Vec<String>,
    subtasks: Vec<String>,
) -> Result<()> {
    if title.trim().is_empty() {
        return Err(StoreError::InvalidName { what: "task" });
    }
    let project = require_project(store, &project)?;
    let categories = resolve_categories(store, &categories)?;
    let due_date = due.as_deref().map(due_from_input).transpose()?;

    let mut draft = TaskDraft::new(&project.id, title.trim());
    draft.description = desc.unwrap_or_default();
    draft.status = status;
    draft.due_date = due_date;
    draft.assignee = assignee.as_deref().filter(|a| !a.trim().is_empty()).map(User::from_name);
    draft.categories = categories;
    draft.subtasks = subtasks
        .iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| Subtask::new(s))
        .collect();

    let task = store.create_task(draft)?;
    println!("Added {} to {} ({})", task.id, project.name, task.status);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_update(
    store: &Store,
    id: &str,
    title: Option<String>,
    desc: Option<String>,
    status: Option<Status>,
    due: Option<String>,
    clear_due: bool,
    assignee: Option<String>,
    clear_assignee: bool,
) -> Result<()> {
    let mut task = store
        .get_task(id)?
        .ok_or_else(|| StoreError::task_not_found(id))?;

    if let Some(title) = title {
        if title.trim().is_empty() {
            return Err(StoreError::InvalidName { what: "task" });
        }
        task.title = title.trim().to_string();
    }
    if let Some(desc) = desc {
        task.description = desc;
    }
    if clear_due {
        task.due_date = None;
    } else if let Some(due) = due {
        task.due_date = Some(due_from_input(&due)?);
    }
    if clear_assignee {
        task.assignee = None;
    } else if let Some(name) = assignee {
        task.assignee = Some(User::from_name(&name));
    }

    // A status change goes through the board so the task lands at the end
    // of its new column with a fresh rank.
    match status {
        Some(status) if status != task.status => {
            let mut board = BoardState::load(store, &task.project_id)?;
            board.replace_task(task.clone())?;
            let mut session = DragSession::new();
            session.start(task.id.clone());
            board.drop_task(&mut session, status, None);
            board.commit(store)?;
        }
        _ => {
            store.update_task(task.clone())?;
        }
    }
    println!("Updated {}", task.id);
    Ok(())
}

/// Drive one drag gesture from the command line and persist it.
pub fn cmd_move(store: &Store, id: &str, status: Status, before: Option<&str>) -> Result<()> {
    let task = store
        .get_task(id)?
        .ok_or_else(|| StoreError::task_not_found(id))?;
    let mut board = BoardState::load(store, &task.project_id)?;

    let mut session = DragSession::new();
    session.start(task.id.clone());
    session.over(status);
    board.drop_task(&mut session, status, before);
    let saved = board.commit(store)?;

    if let Some(target) = before {
        if board.task(target).is_none() || target == id {
            println!("Target {} not on the board; placed at the end of {}", target, status);
        }
    }
    println!("Moved {} to {} ({} task(s) saved)", id, status, saved);
    Ok(())
}

pub fn cmd_subtask(store: &Store, action: SubtaskAction) -> Result<()> {
    match action {
        SubtaskAction::Add { task, text } => {
            let subtask = store.add_subtask(&task, &text)?;
            println!("Added subtask {} to {}", subtask.id, task);
        }
        SubtaskAction::Done { task, subtask } => {
            let t = store.set_subtask_completed(&task, &subtask, true)?;
            let (done, total) = t.subtask_progress();
            println!("{}: {}/{} subtasks done", t.id, done, total);
        }
        SubtaskAction::Undo { task, subtask } => {
            let t = store.set_subtask_completed(&task, &subtask, false)?;
            let (done, total) = t.subtask_progress();
            println!("{}: {}/{} subtasks done", t.id, done, total);
        }
    }
    Ok(())
}

pub fn cmd_categories(store: &Store) -> Result<()> {
    print_categories(&store.get_categories()?);
    Ok(())
}

pub fn cmd_category_add(store: &Store, name: &str, color: &str) -> Result<()> {
    let category = store.create_category(name.trim(), color.trim())?;
    println!("Created category {} ({})", category.name, category.id);
    Ok(())
}

pub fn cmd_category_rm(store: &Store, id: &str) -> Result<()> {
    store.delete_category(id)?;
    println!("Deleted category {}", id);
    Ok(())
}

/// Launch the interactive board.
pub fn cmd_board(store: &Store, project: &str) -> Result<()> {
    let project = require_project(store, project)?;
    run_board_tui(store, &project)
}

pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}

fn require_project(store: &Store, id: &str) -> Result<crate::project::Project> {
    store
        .get_project_by_id(id)?
        .ok_or_else(|| StoreError::ProjectNotFound { id: id.to_string() })
}

/// Look up category ids, keeping the order given and dropping duplicates.
fn resolve_categories(store: &Store, ids: &[String]) -> Result<Vec<Category>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let all = store.get_categories()?;
    let mut out: Vec<Category> = Vec::new();
    for id in ids {
        let category = all
            .iter()
            .find(|c| &c.id == id)
            .ok_or_else(|| StoreError::CategoryNotFound { id: id.clone() })?;
        if !out.iter().any(|c| c.id == category.id) {
            out.push(category.clone());
        }
    }
    Ok(out)
}
