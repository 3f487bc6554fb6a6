//! TUI application state machine.
//!
//! Holds the latest report, the scroll position, and whether the display
//! should keep running.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tcpwatch_common::config::MonitorConfig;
use tcpwatch_common::types::Report;

use crate::event::TerminalEvent;

/// Lines moved by PageUp/PageDown.
pub const PAGE_LINES: u16 = 10;

/// Root application state for the TUI.
#[derive(Debug)]
pub struct App {
    /// Whether the app should continue running.
    pub running: bool,
    /// Most recent report, `None` until the first tick lands.
    pub report: Option<Report>,
    /// First visible line of the table.
    pub scroll: u16,
    /// Whether the refresh loop repeats.
    pub live: bool,
    /// Seconds between refresh ticks.
    pub interval_secs: u64,
    /// Set once the refresh worker has exited.
    pub refresh_stopped: bool,
}

impl App {
    /// Creates the application state for a session.
    #[must_use]
    pub const fn new(config: &MonitorConfig) -> Self {
        Self {
            running: true,
            report: None,
            scroll: 0,
            live: config.live,
            interval_secs: config.interval_secs,
            refresh_stopped: false,
        }
    }

    /// Signals the app to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Number of text lines the current report renders to.
    #[must_use]
    pub fn line_count(&self) -> usize {
        match &self.report {
            // header + separator + rows
            Some(Report::Table { connections, .. }) => connections.len() + 2,
            Some(Report::Error { .. }) | None => 1,
        }
    }

    fn max_scroll(&self) -> u16 {
        u16::try_from(self.line_count().saturating_sub(1)).unwrap_or(u16::MAX)
    }

    /// Replaces the displayed report, keeping the scroll position in range.
    pub fn apply_report(&mut self, report: Report) {
        self.report = Some(report);
        self.scroll = self.scroll.min(self.max_scroll());
    }

    /// Scrolls towards the top.
    pub const fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Scrolls towards the bottom.
    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines).min(self.max_scroll());
    }

    /// Applies a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                tracing::info!("quit requested with Ctrl+C");
                self.quit();
            }
            (KeyCode::Char('q') | KeyCode::Esc, _) => {
                tracing::info!("quit requested");
                self.quit();
            }
            (KeyCode::Up | KeyCode::Char('k'), _) => self.scroll_up(1),
            (KeyCode::Down | KeyCode::Char('j'), _) => self.scroll_down(1),
            (KeyCode::PageUp, _) => self.scroll_up(PAGE_LINES),
            (KeyCode::PageDown, _) => self.scroll_down(PAGE_LINES),
            (KeyCode::Home, _) => self.scroll = 0,
            (KeyCode::End, _) => self.scroll = self.max_scroll(),
            _ => {}
        }
    }

    /// Applies one event from the [`EventHandler`](crate::event::EventHandler).
    pub fn handle_event(&mut self, event: TerminalEvent) {
        match event {
            TerminalEvent::Key(key) => self.handle_key(key),
            TerminalEvent::Refresh(report) => self.apply_report(*report),
            TerminalEvent::RefreshStopped => {
                tracing::debug!("refresh worker finished");
                self.refresh_stopped = true;
            }
            TerminalEvent::Resize(..) | TerminalEvent::Tick => {}
        }
    }
}
