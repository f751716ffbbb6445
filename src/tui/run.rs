//! Board TUI entry point and terminal setup.

use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};

use crate::db::Store;
use crate::error::{Result, StoreError};
use crate::project::Project;
use crate::tui::board::BoardApp;

/// Initialise and run the board interface for one project.
pub fn run_board_tui(store: &Store, project: &Project) -> Result<()> {
    let mut app = BoardApp::new(store, project.clone())?;
    run_in_terminal(&mut app).map_err(StoreError::Terminal)
}

fn run_in_terminal(app: &mut BoardApp) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
