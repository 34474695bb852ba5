/*
[INPUT]:  Crossterm keyboard events from the blocking poller
[OUTPUT]: Input events on an async channel, quit-key classification
[POS]:    TUI input handling
[UPDATE]: When changing keybindings or the poll cadence
*/

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyModifiers};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Spawn the blocking input poller. Events arrive on the returned channel
/// until shutdown is cancelled or the receiver is dropped.
pub(super) fn spawn_input_poller(
    shutdown: CancellationToken,
) -> mpsc::UnboundedReceiver<CrosstermEvent> {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    tokio::task::spawn_blocking(move || {
        while !shutdown.is_cancelled() {
            if crossterm::event::poll(INPUT_POLL_INTERVAL).unwrap_or(false) {
                if let Ok(event) = crossterm::event::read() {
                    if event_tx.send(event).is_err() {
                        break;
                    }
                }
            }
        }
    });
    event_rx
}

pub(super) fn is_quit_key(code: KeyCode, modifiers: KeyModifiers) -> bool {
    matches!(code, KeyCode::Char('q') | KeyCode::Esc)
        || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL))
}
