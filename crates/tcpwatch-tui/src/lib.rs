//! # tcpwatch-tui
//!
//! Interactive terminal display of TCP sockets and their owning processes.
//!
//! Built with `ratatui` and `crossterm`, providing:
//! - A live, scrollable table refreshed by a background worker.
//! - Inline, red error reporting when the kernel table is unreadable.
//! - Clean shutdown on `q`, Esc, or Ctrl+C.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod app;
pub mod event;
pub mod terminal;
pub mod ui;

use std::time::Duration;

use tcpwatch_common::config::MonitorConfig;
use tcpwatch_common::error::{Result, TcpWatchError};
use tcpwatch_core::RefreshLoop;

use crate::app::App;
use crate::event::EventHandler;

/// How long the UI waits for input before redrawing.
pub const TICK_RATE: Duration = Duration::from_millis(200);

/// Runs the interactive display until the user quits.
///
/// # Errors
///
/// Returns an error if the refresh worker cannot start or the terminal
/// cannot be set up, drawn to, or restored. Table read failures are shown
/// inline and never end the session.
pub fn run(config: &MonitorConfig) -> Result<()> {
    let (tx, rx) = crossbeam_channel::unbounded();
    let refresh = RefreshLoop::new(config)
        .spawn(move |report| {
            // The receiver is gone once the UI has quit.
            let _ = tx.send(report);
        })
        .map_err(|source| TcpWatchError::Spawn { source })?;

    let mut terminal = terminal::setup()?;
    let mut app = App::new(config);
    let mut events = EventHandler::new(rx, TICK_RATE);

    let result = event_loop(&mut terminal, &mut app, &mut events);

    let restored = terminal::restore(&mut terminal);
    refresh.stop();
    result.and(restored)
}

fn event_loop(terminal: &mut terminal::Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while app.running {
        let _ = terminal
            .draw(|frame| ui::draw(frame, app))
            .map_err(|source| TcpWatchError::Terminal { source })?;
        app.handle_event(events.next()?);
    }
    Ok(())
}
