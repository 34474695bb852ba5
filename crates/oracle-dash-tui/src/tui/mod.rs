/*
[INPUT]:  Shared TableModel, connection state watch, shutdown token
[OUTPUT]: Ratatui dashboard loop with keyboard handling
[POS]:    TUI module for the oracle-dash-tui binary
[UPDATE]: When changing the draw cadence or loop shape
*/

mod app;
mod events;
mod terminal;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use tokio_util::sync::CancellationToken;

use crate::feed::ConnectionState;
use crate::table::TableModel;
use events::{is_quit_key, spawn_input_poller};
use terminal::TerminalGuard;

const UI_TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Run the dashboard until the user quits or shutdown is requested.
pub async fn run(
    table: Arc<Mutex<TableModel>>,
    mut connection_state: tokio::sync::watch::Receiver<ConnectionState>,
    shutdown: CancellationToken,
) -> Result<()> {
    let mut terminal = TerminalGuard::new()?;
    let mut event_rx = spawn_input_poller(shutdown.clone());

    let mut tick = tokio::time::interval(UI_TICK_INTERVAL);
    loop {
        let state = *connection_state.borrow();
        {
            let table = table.lock().expect("table lock");
            terminal.draw(|frame| app::draw_dashboard(frame, &table, state))?;
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tick.tick() => {}
            _ = connection_state.changed() => {}
            maybe_event = event_rx.recv() => {
                if let Some(CrosstermEvent::Key(key)) = maybe_event {
                    if is_quit_key(key.code, key.modifiers) {
                        shutdown.cancel();
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}
