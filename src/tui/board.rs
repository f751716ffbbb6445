//! Kanban board interface.
//!
//! One column per status. A card is picked up with Space (drag-start),
//! carried with the arrow keys (drag-over), and put down with Space again
//! (drop): before the card under the cursor, or at the column tail when the
//! cursor sits on the empty slot below the last card. Every drop is committed
//! right away; a failed commit reverts the board and reports the error in the
//! status bar.

use std::io;
use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::debug;

use crate::board::{BoardState, SyncState};
use crate::dates::format_due_relative;
use crate::db::Store;
use crate::fields::Status;
use crate::project::Project;
use crate::render::truncate;
use crate::reorder::DragSession;
use crate::task::Task;
use crate::tui::colors::{category_style, status_color, text_on, DARK_PURPLE};

const COLUMNS: usize = Status::ALL.len();
const CARD_HEIGHT: usize = 5;

/// Board application state.
pub struct BoardApp<'a> {
    store: &'a Store,
    project: Project,
    board: BoardState,
    session: DragSession,
    selected_column: usize,
    /// Index within the column; equal to the column length for the tail slot while dragging.
    selected_card: usize,
    column_scroll_offsets: [usize; COLUMNS],
    status_message: String,
    show_task_detail: bool,
}

impl<'a> BoardApp<'a> {
    pub fn new(store: &'a Store, project: Project) -> crate::error::Result<Self> {
        let board = BoardState::load(store, &project.id)?;
        Ok(BoardApp {
            store,
            project,
            board,
            session: DragSession::new(),
            selected_column: 0,
            selected_card: 0,
            column_scroll_offsets: [0; COLUMNS],
            status_message: String::new(),
            show_task_detail: false,
        })
    }

    fn column_status(index: usize) -> Status {
        Status::ALL[index]
    }

    fn column_tasks(&self, index: usize) -> Vec<&Task> {
        let status = Self::column_status(index);
        self.board.tasks().iter().filter(|t| t.status == status).collect()
    }

    fn column_len(&self, index: usize) -> usize {
        self.column_tasks(index).len()
    }

    /// Number of selectable slots in a column.
    fn slot_count(&self, index: usize) -> usize {
        let len = self.column_len(index);
        if self.session.is_dragging() {
            len + 1
        } else {
            len
        }
    }

    fn selected_task(&self) -> Option<&Task> {
        self.column_tasks(self.selected_column)
            .get(self.selected_card)
            .copied()
    }

    fn clamp_selection(&mut self) {
        let slots = self.slot_count(self.selected_column);
        if slots == 0 {
            self.selected_card = 0;
        } else if self.selected_card >= slots {
            self.selected_card = slots - 1;
        }
    }

    /// Put the cursor on the card with `id`, wherever it now is.
    fn select_task(&mut self, id: &str) {
        for col in 0..COLUMNS {
            if let Some(pos) = self.column_tasks(col).iter().position(|t| t.id == id) {
                self.selected_column = col;
                self.selected_card = pos;
                return;
            }
        }
        self.clamp_selection();
    }

    fn reload(&mut self) {
        match self.board.reload(self.store) {
            Ok(()) => {
                self.status_message = "Reloaded".to_string();
            }
            Err(e) => self.status_message = format!("Reload failed: {}", e),
        }
        self.clamp_selection();
    }

    /// drag-start on the selected card.
    fn pick_up(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let (id, title) = (task.id.clone(), task.title.clone());
        self.session.start(id);
        self.status_message = format!("Carrying '{}': arrows to move, Space to drop, Esc to cancel", title);
    }

    /// drop at the cursor and commit.
    fn put_down(&mut self) {
        let Some(dragged) = self.session.active().map(str::to_string) else {
            return;
        };
        let column = Self::column_status(self.selected_column);
        let target = self.selected_task().map(|t| t.id.clone());
        let changed = self.board.drop_task(&mut self.session, column, target.as_deref());
        debug!(task = %dragged, column = %column, changed = changed.len(), "card dropped");

        match self.board.commit(self.store) {
            Ok(_) => {
                self.status_message = format!("Moved to {}", column);
                self.select_task(&dragged);
            }
            Err(e) => {
                self.status_message = format!("Could not save move: {}", e);
                self.select_task(&dragged);
            }
        }
    }

    fn cancel_drag(&mut self) {
        self.session.cancel();
        self.clamp_selection();
        self.status_message = "Move cancelled".to_string();
    }

    /// Toggle the first incomplete subtask, or reopen the last one when all are done.
    fn toggle_subtask(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let mut task = task.clone();
        let index = task
            .subtasks
            .iter()
            .position(|s| !s.completed)
            .or_else(|| task.subtasks.len().checked_sub(1));
        let Some(index) = index else {
            self.status_message = "No subtasks".to_string();
            return;
        };
        task.subtasks[index].completed = !task.subtasks[index].completed;
        let text = task.subtasks[index].text.clone();
        if let Err(e) = self.board.replace_task(task) {
            self.status_message = e.to_string();
            return;
        }
        self.status_message = match self.board.commit(self.store) {
            Ok(_) => format!("Toggled '{}'", text),
            Err(e) => format!("Could not save subtask: {}", e),
        };
    }

    fn move_column(&mut self, delta: isize) {
        let next = self.selected_column as isize + delta;
        if next < 0 || next >= COLUMNS as isize {
            return;
        }
        self.selected_column = next as usize;
        if self.session.is_dragging() {
            self.session.over(Self::column_status(self.selected_column));
        }
        self.clamp_selection();
    }

    /// Handle keyboard input. Returns true when the app should exit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if !event::poll(Duration::from_millis(50))? {
            return Ok(false);
        }
        let Event::Key(key) = event::read()? else {
            return Ok(false);
        };
        if key.kind != KeyEventKind::Press {
            return Ok(false);
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Esc if self.session.is_dragging() => self.cancel_drag(),
            KeyCode::Esc if self.show_task_detail => self.show_task_detail = false,
            KeyCode::Esc => return Ok(true),
            KeyCode::Char(' ') => {
                if self.session.is_dragging() {
                    self.put_down();
                } else {
                    self.pick_up();
                }
            }
            KeyCode::Enter => self.show_task_detail = !self.show_task_detail,
            KeyCode::Left => self.move_column(-1),
            KeyCode::Right => self.move_column(1),
            KeyCode::Up => {
                self.selected_card = self.selected_card.saturating_sub(1);
            }
            KeyCode::Down => {
                let slots = self.slot_count(self.selected_column);
                if slots > 0 && self.selected_card < slots - 1 {
                    self.selected_card += 1;
                }
            }
            KeyCode::Char('x') => self.toggle_subtask(),
            KeyCode::Char('r') => self.reload(),
            _ => {}
        }
        Ok(false)
    }

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_board(f, chunks[1]);
        self.render_status_bar(f, chunks[2]);

        if self.show_task_detail {
            self.render_task_detail_popup(f);
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let header = Line::from(vec![
            Span::styled(self.project.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!("{} tasks", self.board.tasks().len()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ]);
        let block = Paragraph::new(header)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(block, area);
    }

    fn render_board(&mut self, f: &mut Frame, area: Rect) {
        let constraints: Vec<Constraint> = (0..COLUMNS)
            .map(|_| Constraint::Ratio(1, COLUMNS as u32))
            .collect();
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (i, &column_area) in layout.iter().enumerate() {
            self.render_column(f, column_area, i);
        }
    }

    fn render_column(&mut self, f: &mut Frame, area: Rect, index: usize) {
        let status = Self::column_status(index);
        let is_selected = index == self.selected_column;
        let color = status_color(status);
        let len = self.column_len(index);

        let border_style = if is_selected {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("{} ({})", status, len))
            .border_style(border_style);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let visible = (inner.height as usize / CARD_HEIGHT).max(1);
        let slots = self.slot_count(index);
        if is_selected && slots > 0 {
            let start = self.column_scroll_offsets[index];
            if self.selected_card < start {
                self.column_scroll_offsets[index] = self.selected_card;
            } else if self.selected_card >= start + visible {
                self.column_scroll_offsets[index] = self.selected_card + 1 - visible;
            }
        }
        let offset = self.column_scroll_offsets[index].min(len);

        let carrying = self.session.active().map(str::to_string);
        let cards = self.column_tasks(index);
        let mut y = 0;
        for (card_index, task) in cards.iter().enumerate().skip(offset) {
            if y + CARD_HEIGHT > inner.height as usize {
                break;
            }
            let card_area = Rect {
                x: inner.x,
                y: inner.y + y as u16,
                width: inner.width,
                height: CARD_HEIGHT as u16,
            };
            let cursor_here = is_selected && card_index == self.selected_card;
            let is_carried = carrying.as_deref() == Some(task.id.as_str());
            self.render_card(f, card_area, task, cursor_here, is_carried);
            y += CARD_HEIGHT;
        }

        // Tail slot: where a drop with no target card lands.
        if carrying.is_some() && is_selected && self.selected_card == len && y < inner.height as usize {
            let slot = Paragraph::new("── drop at end ──")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Black).bg(DARK_PURPLE));
            f.render_widget(slot, Rect { x: inner.x, y: inner.y + y as u16, width: inner.width, height: 1 });
        }

        if offset > 0 {
            let indicator = Paragraph::new(format!("▲ +{} above", offset)).style(Style::default().fg(Color::Cyan));
            f.render_widget(indicator, Rect { x: inner.x, y: inner.y, width: inner.width, height: 1 });
        }
    }

    fn render_card(&self, f: &mut Frame, area: Rect, task: &Task, cursor_here: bool, is_carried: bool) {
        let status_bg = status_color(task.status);
        let style = if is_carried {
            Style::default().bg(DARK_PURPLE).fg(Color::White).add_modifier(Modifier::ITALIC)
        } else if cursor_here {
            Style::default().bg(status_bg).fg(text_on(status_bg)).add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::DarkGray)
        };
        let width = area.width.saturating_sub(2) as usize;

        let marker = match self.board.sync_state(&task.id) {
            SyncState::Pending => "… ",
            SyncState::Confirmed => "",
        };
        let drop_hint = if cursor_here && self.session.is_dragging() && !is_carried { "▶ " } else { "" };
        let title = Line::from(truncate(&format!("{}{}{}", drop_hint, marker, task.title), width));

        let today = Local::now().date_naive();
        let (done, total) = task.subtask_progress();
        let mut meta = vec![
            task.assignee.as_ref().map(|u| u.name.clone()).unwrap_or_else(|| "Unassigned".into()),
            format_due_relative(task.due_date, today),
        ];
        if total > 0 {
            meta.push(format!("{}/{}", done, total));
        }
        let meta = Line::from(truncate(&meta.join(" | "), width));

        let mut chips = Vec::new();
        for c in &task.categories {
            chips.push(Span::styled(format!(" {} ", c.name), category_style(c)));
            chips.push(Span::raw(" "));
        }

        let card = Paragraph::new(vec![title, meta, Line::from(chips)])
            .block(Block::default().borders(Borders::ALL))
            .style(style);
        f.render_widget(card, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            "Space: pick up/drop | ←→↑↓: move | Enter: details | x: subtask | r: reload | q: quit".to_string()
        };
        let bg = if self.session.is_dragging() {
            DARK_PURPLE
        } else {
            status_color(Self::column_status(self.selected_column))
        };
        let bar = Paragraph::new(text).style(Style::default().bg(bg).fg(text_on(bg)));
        f.render_widget(bar, area);
    }

    fn render_task_detail_popup(&self, f: &mut Frame) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let area = f.area();
        let popup = Rect::new(area.width / 10, area.height / 10, area.width * 8 / 10, area.height * 8 / 10);
        f.render_widget(Clear, popup);

        let today = Local::now().date_naive();
        let mut lines = vec![
            Line::from(Span::styled(task.title.clone(), Style::default().add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from(format!("Status:     {}", task.status)),
            Line::from(format!(
                "Assignee:   {}",
                task.assignee.as_ref().map(|u| u.name.as_str()).unwrap_or("Unassigned")
            )),
            Line::from(format!("Due:        {}", format_due_relative(task.due_date, today))),
            Line::from(format!("Id:         {}", task.id)),
            Line::from(""),
            Line::from(if task.description.is_empty() { "-".to_string() } else { task.description.clone() }),
        ];
        if !task.subtasks.is_empty() {
            lines.push(Line::from(""));
            for s in &task.subtasks {
                lines.push(Line::from(format!("[{}] {}", if s.completed { "x" } else { " " }, s.text)));
            }
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Task Details (Enter to close)")
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(status_color(task.status)).add_modifier(Modifier::BOLD));
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .style(Style::default().bg(Color::Black));
        f.render_widget(paragraph, popup);
    }

    /// Main event loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;
            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::task::TaskDraft;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Store, Project) {
        let temp = TempDir::new().unwrap();
        let store = Store::open(StoreConfig::new(temp.path().join("db.json"))).unwrap();
        let project = store.create_project("Board").unwrap();
        for title in ["a", "b"] {
            store.create_task(TaskDraft::new(&project.id, title)).unwrap();
        }
        let mut draft = TaskDraft::new(&project.id, "c");
        draft.status = Status::InProgress;
        store.create_task(draft).unwrap();
        (temp, store, project)
    }

    fn titles_in(app: &BoardApp, column: usize) -> Vec<String> {
        app.column_tasks(column).iter().map(|t| t.title.clone()).collect()
    }

    #[test]
    fn test_pick_up_and_drop_before_card() {
        let (_temp, store, project) = setup();
        let mut app = BoardApp::new(&store, project).unwrap();

        app.selected_card = 1; // "b"
        app.pick_up();
        assert!(app.session.is_dragging());
        app.move_column(1);
        app.selected_card = 0; // before "c"
        app.put_down();

        assert!(!app.session.is_dragging());
        assert_eq!(titles_in(&app, 1), vec!["b", "c"]);
        assert_eq!(app.selected_column, 1);
        assert_eq!(app.selected_card, 0);
        assert!(!app.board.has_pending());
    }

    #[test]
    fn test_drop_on_tail_slot() {
        let (_temp, store, project) = setup();
        let mut app = BoardApp::new(&store, project).unwrap();

        app.pick_up(); // "a"
        app.move_column(2);
        assert_eq!(app.slot_count(2), 1);
        app.put_down();

        assert_eq!(titles_in(&app, 2), vec!["a"]);
        assert_eq!(titles_in(&app, 0), vec!["b"]);
    }

    #[test]
    fn test_cancel_keeps_board() {
        let (_temp, store, project) = setup();
        let mut app = BoardApp::new(&store, project).unwrap();
        app.pick_up();
        app.move_column(1);
        app.cancel_drag();
        assert_eq!(titles_in(&app, 0), vec!["a", "b"]);
        assert_eq!(titles_in(&app, 1), vec!["c"]);
    }

    #[test]
    fn test_toggle_subtask_persists() {
        let (_temp, store, project) = setup();
        let first = store.get_project_tasks(&project.id).unwrap()[0].clone();
        store.add_subtask(&first.id, "check").unwrap();

        let mut app = BoardApp::new(&store, project).unwrap();
        app.toggle_subtask();
        let saved = store.get_task(&first.id).unwrap().unwrap();
        assert!(saved.subtasks[0].completed);
    }
}
