/*
[INPUT]:  Crossterm stdout, terminal raw mode, ratatui backend
[OUTPUT]: TerminalGuard managing alternate screen lifecycle
[POS]:    TUI terminal lifecycle guard
[UPDATE]: When changing terminal setup or restore behavior
*/

use std::io;

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::warn;

/// Owns raw mode and the alternate screen for the life of the dashboard.
/// Restore runs in Drop, so a panicking draw loop still hands the shell
/// back in a usable state.
pub(super) struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    pub(super) fn new() -> Result<Self> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide).context("enter alternate screen")?;
        let terminal =
            Terminal::new(CrosstermBackend::new(stdout)).context("create terminal")?;
        Ok(Self { terminal })
    }

    pub(super) fn draw<F>(&mut self, render: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(render).context("draw dashboard frame")?;
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = execute!(io::stdout(), Show, LeaveAlternateScreen) {
            warn!(error = %err, "failed to leave alternate screen");
        }
        if let Err(err) = terminal::disable_raw_mode() {
            warn!(error = %err, "failed to disable raw mode");
        }
    }
}
