//! Periodic refresh driver.
//!
//! Runs refresh ticks back to back with a fixed delay and hands each
//! [`Report`] to a sink. Cancellation is cooperative: the token is checked
//! at the top of every iteration and while waiting between ticks, so a
//! cancel always lands between ticks and never interrupts one.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tcpwatch_common::config::MonitorConfig;
use tcpwatch_common::types::Report;

use crate::procfs::ProcFs;
use crate::report::fetch_report;

/// Longest uninterrupted sleep while waiting for the next tick.
const WAIT_SLICE: Duration = Duration::from_millis(100);

/// Shared stop flag for a refresh loop.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Never blocks.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// A configured refresh loop.
#[derive(Debug, Clone)]
pub struct RefreshLoop {
    proc: ProcFs,
    interval: Duration,
    live: bool,
}

impl RefreshLoop {
    /// Creates a loop from a session configuration.
    #[must_use]
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            proc: ProcFs::new(config.proc_root.clone()),
            interval: config.interval(),
            live: config.live,
        }
    }

    /// Overrides the delay between ticks.
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Runs ticks until cancelled, or once in single-shot mode.
    ///
    /// Returns the number of ticks performed.
    pub fn run<F>(&self, token: &CancellationToken, mut sink: F) -> usize
    where
        F: FnMut(Report),
    {
        tracing::info!(
            root = %self.proc.root().display(),
            interval_ms = self.interval.as_millis(),
            live = self.live,
            "refresh loop started"
        );
        let mut ticks = 0;
        loop {
            if token.is_cancelled() {
                tracing::debug!(ticks, "refresh loop cancelled");
                break;
            }
            sink(fetch_report(&self.proc));
            ticks += 1;

            if !self.live || !self.wait(token) {
                break;
            }
        }
        tracing::info!(ticks, "refresh loop stopped");
        ticks
    }

    /// Sleeps until the next tick is due. Returns `false` if cancelled.
    ///
    /// An interval too large to schedule waits until cancellation.
    fn wait(&self, token: &CancellationToken) -> bool {
        let Some(deadline) = Instant::now().checked_add(self.interval) else {
            tracing::debug!("refresh interval out of range; waiting for cancellation");
            while !token.is_cancelled() {
                std::thread::sleep(WAIT_SLICE);
            }
            return false;
        };
        loop {
            if token.is_cancelled() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            std::thread::sleep((deadline - now).min(WAIT_SLICE));
        }
    }

    /// Runs the loop on a dedicated thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn<F>(self, sink: F) -> std::io::Result<RefreshHandle>
    where
        F: FnMut(Report) + Send + 'static,
    {
        let token = CancellationToken::new();
        let thread_token = token.clone();
        let thread = std::thread::Builder::new()
            .name("tcpwatch-refresh".into())
            .spawn(move || {
                let _ = self.run(&thread_token, sink);
            })?;
        Ok(RefreshHandle {
            token,
            thread: Some(thread),
        })
    }
}

/// Handle to a refresh loop running on its own thread.
#[derive(Debug)]
pub struct RefreshHandle {
    token: CancellationToken,
    thread: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    /// Cancels the loop and waits for the in-flight tick to finish.
    pub fn stop(mut self) {
        self.token.cancel();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("refresh thread panicked");
            }
        }
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
