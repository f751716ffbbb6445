//! Plain-text rendering for the CLI.

use chrono::{Local, NaiveDate};

use crate::board::BoardState;
use crate::category::Category;
use crate::dates::format_due_relative;
use crate::fields::Status;
use crate::project::Project;
use crate::task::Task;

/// Truncate a string to a maximum width, adding an ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

/// One task as a table row.
pub fn task_row(t: &Task, today: NaiveDate) -> String {
    let assignee = t.assignee.as_ref().map(|u| u.name.as_str()).unwrap_or("Unassigned");
    let (done, total) = t.subtask_progress();
    let subtasks = if total == 0 { "-".to_string() } else { format!("{}/{}", done, total) };
    let categories = if t.categories.is_empty() {
        String::new()
    } else {
        let names: Vec<&str> = t.categories.iter().map(|c| c.name.as_str()).collect();
        format!(" [{}]", names.join(","))
    };
    format!(
        "{:<30} {:<14} {:<10} {:<6} {}{}",
        truncate(&t.id, 30),
        truncate(assignee, 14),
        format_due_relative(t.due_date, today),
        subtasks,
        t.title,
        categories
    )
}

/// List view: one section per status, empty sections skipped.
pub fn print_grouped(board: &BoardState, only: Option<Status>) {
    let today = Local::now().date_naive();
    let mut printed = false;
    for (status, tasks) in board.columns() {
        if only.is_some_and(|s| s != status) || tasks.is_empty() {
            continue;
        }
        if printed {
            println!();
        }
        println!("{} ({})", status, tasks.len());
        println!(
            "  {:<30} {:<14} {:<10} {:<6} {}",
            "ID", "Assignee", "Due", "Subs", "Title [categories]"
        );
        for t in tasks {
            println!("  {}", task_row(t, today));
        }
        printed = true;
    }
    if !printed {
        println!("No tasks.");
    }
}

pub fn print_projects(projects: &[Project]) {
    if projects.is_empty() {
        println!("No projects yet. Create one with `tb project-add <name>`.");
        return;
    }
    println!("{:<32} {:>5}  {}", "ID", "Tasks", "Name");
    for p in projects {
        println!("{:<32} {:>5}  {}", truncate(&p.id, 32), p.task_count, p.name);
    }
}

pub fn print_project(project: &Project, board: &BoardState) {
    println!("{} ({})", project.name, project.id);
    println!("Image:      {}", project.image_url);
    println!("Task count: {}", project.task_count);
    for (status, tasks) in board.columns() {
        println!("  {:<12} {}", status.label(), tasks.len());
    }
}

pub fn print_categories(categories: &[Category]) {
    if categories.is_empty() {
        println!("No categories.");
        return;
    }
    println!("{:<24} {:<10} {}", "ID", "Color", "Name");
    for c in categories {
        println!("{:<24} {:<10} {}", c.id, truncate(&c.color, 10), c.name);
    }
}

/// Full detail of one task.
pub fn print_task(t: &Task) {
    let today = Local::now().date_naive();
    println!("{}", t.title);
    println!("  id:          {}", t.id);
    println!("  project:     {}", t.project_id);
    println!("  status:      {}", t.status);
    println!(
        "  assignee:    {}",
        t.assignee.as_ref().map(|u| u.name.as_str()).unwrap_or("Unassigned")
    );
    match t.due_date {
        Some(d) => println!(
            "  due:         {} ({})",
            d.date_naive(),
            format_due_relative(t.due_date, today)
        ),
        None => println!("  due:         -"),
    }
    if !t.categories.is_empty() {
        let names: Vec<&str> = t.categories.iter().map(|c| c.name.as_str()).collect();
        println!("  categories:  {}", names.join(", "));
    }
    if !t.description.is_empty() {
        println!();
        println!("{}", t.description);
    }
    if !t.subtasks.is_empty() {
        println!();
        for s in &t.subtasks {
            let mark = if s.completed { "x" } else { " " };
            println!("  [{}] {}  ({})", mark, s.text, s.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Subtask, TaskDraft, User};

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long title here", 6), "a lon…");
    }

    #[test]
    fn test_task_row() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let mut draft = TaskDraft::new("p", "Ship it");
        draft.assignee = Some(User::from_name("Ben C."));
        draft.subtasks = vec![Subtask::new("one"), Subtask::new("two")];
        draft.categories = vec![Category {
            id: "cat-1".into(),
            name: "Backend".into(),
            color: "#22c55e".into(),
        }];
        let row = task_row(&draft.into_task("task-1".into(), 1), today);
        assert!(row.starts_with("task-1"));
        assert!(row.contains("Ben C."));
        assert!(row.contains("0/2"));
        assert!(row.ends_with("Ship it [Backend]"));
    }
}
