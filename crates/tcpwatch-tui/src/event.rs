//! Terminal event handling.
//!
//! Merges keyboard and resize events from the terminal with reports coming
//! from the refresh worker into one stream for the application state
//! machine.

use std::time::Duration;

use crossbeam_channel::{Receiver, TryRecvError};
use crossterm::event::{Event, KeyEvent, KeyEventKind};
use tcpwatch_common::error::{Result, TcpWatchError};
use tcpwatch_common::types::Report;

/// Terminal input events.
#[derive(Debug, Clone)]
pub enum TerminalEvent {
    /// A key was pressed.
    Key(KeyEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// Nothing happened within the tick rate.
    Tick,
    /// The refresh worker produced a new report.
    Refresh(Box<Report>),
    /// The refresh worker has stopped and will send nothing more.
    RefreshStopped,
}

/// Source of [`TerminalEvent`]s for the UI loop.
#[derive(Debug)]
pub struct EventHandler {
    reports: Receiver<Report>,
    tick_rate: Duration,
    worker_done: bool,
}

impl EventHandler {
    /// Creates a handler reading reports from `reports`.
    #[must_use]
    pub const fn new(reports: Receiver<Report>, tick_rate: Duration) -> Self {
        Self {
            reports,
            tick_rate,
            worker_done: false,
        }
    }

    /// Returns a pending report, if the worker has sent one.
    pub fn try_report(&mut self) -> Option<TerminalEvent> {
        if self.worker_done {
            return None;
        }
        match self.reports.try_recv() {
            Ok(report) => Some(TerminalEvent::Refresh(Box::new(report))),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.worker_done = true;
                Some(TerminalEvent::RefreshStopped)
            }
        }
    }

    /// Waits up to one tick for the next event.
    ///
    /// Pending reports are delivered before terminal input.
    ///
    /// # Errors
    ///
    /// Returns [`TcpWatchError::Terminal`] if polling the terminal fails.
    pub fn next(&mut self) -> Result<TerminalEvent> {
        if let Some(event) = self.try_report() {
            return Ok(event);
        }
        let terminal_error = |source| TcpWatchError::Terminal { source };
        if !crossterm::event::poll(self.tick_rate).map_err(terminal_error)? {
            return Ok(TerminalEvent::Tick);
        }
        Ok(match crossterm::event::read().map_err(terminal_error)? {
            Event::Key(key) if key.kind == KeyEventKind::Press => TerminalEvent::Key(key),
            Event::Resize(width, height) => TerminalEvent::Resize(width, height),
            _ => TerminalEvent::Tick,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Local;

    use super::*;

    #[test]
    fn queued_report_is_delivered_first() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut events = EventHandler::new(rx, Duration::from_millis(10));
        tx.send(Report::Table {
            connections: Vec::new(),
            taken_at: Local::now(),
        })
        .unwrap();

        assert!(matches!(events.try_report(), Some(TerminalEvent::Refresh(_))));
        assert!(events.try_report().is_none());
    }

    #[test]
    fn disconnect_is_reported_once() {
        let (tx, rx) = crossbeam_channel::unbounded::<Report>();
        let mut events = EventHandler::new(rx, Duration::from_millis(10));
        drop(tx);

        assert!(matches!(
            events.try_report(),
            Some(TerminalEvent::RefreshStopped)
        ));
        assert!(events.try_report().is_none());
    }
}
