//! Raw-mode terminal setup and teardown.

use std::io::{self, Stdout};

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tcpwatch_common::error::{Result, TcpWatchError};

/// Terminal type driven by the display.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

const fn terminal_error(source: io::Error) -> TcpWatchError {
    TcpWatchError::Terminal { source }
}

/// Enters raw mode and the alternate screen.
///
/// # Errors
///
/// Returns [`TcpWatchError::Terminal`] if the terminal cannot be prepared.
pub fn setup() -> Result<Tui> {
    enable_raw_mode().map_err(terminal_error)?;
    let terminal = rollback_on_error(enter_screen(), || {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        disable_raw_mode()
    })?;
    tracing::debug!("terminal initialized");
    Ok(terminal)
}

fn enter_screen() -> io::Result<Tui> {
    execute!(io::stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(terminal)
}

/// Runs `rollback` when a setup step failed, keeping the original error.
fn rollback_on_error<T>(
    step: io::Result<T>,
    rollback: impl FnOnce() -> io::Result<()>,
) -> Result<T> {
    step.map_err(|source| {
        if let Err(e) = rollback() {
            tracing::warn!(error = %e, "failed to roll back terminal setup");
        }
        terminal_error(source)
    })
}

/// Leaves the alternate screen and restores cooked mode.
///
/// # Errors
///
/// Returns [`TcpWatchError::Terminal`] if the terminal cannot be restored.
pub fn restore(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().map_err(terminal_error)?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).map_err(terminal_error)?;
    terminal.show_cursor().map_err(terminal_error)?;
    tracing::debug!("terminal restored");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn failed_setup_step_rolls_back_and_keeps_its_error() {
        let rolled_back = Cell::new(false);
        let result: Result<()> = rollback_on_error(
            Err(io::Error::other("alternate screen unavailable")),
            || {
                rolled_back.set(true);
                Ok(())
            },
        );

        assert!(rolled_back.get());
        let err = result.unwrap_err();
        assert!(matches!(err, TcpWatchError::Terminal { .. }));
        assert_eq!(err.to_string(), "terminal error: alternate screen unavailable");
    }

    #[test]
    fn successful_setup_step_skips_rollback() {
        let rolled_back = Cell::new(false);
        let value = rollback_on_error(Ok(7), || {
            rolled_back.set(true);
            Ok(())
        })
        .unwrap();

        assert_eq!(value, 7);
        assert!(!rolled_back.get());
    }
}
