//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use tcpwatch_common::config::MonitorConfig;
use tcpwatch_common::constants::{BIN_NAME, DEFAULT_PROC_ROOT, DEFAULT_REFRESH_SECS};

/// tcpwatch: live view of TCP sockets and the processes that own them.
#[derive(Parser, Debug)]
#[command(name = BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Keep refreshing; `--live false` takes a single snapshot.
    #[arg(long, value_name = "BOOL", default_value_t = true, action = ArgAction::Set)]
    pub live: bool,

    /// Refresh interval in seconds.
    #[arg(
        short,
        long,
        value_name = "SECONDS",
        default_value_t = DEFAULT_REFRESH_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval: u64,

    /// Root of the proc filesystem to read.
    #[arg(long, value_name = "PATH", env = "TCPWATCH_PROC_ROOT", default_value = DEFAULT_PROC_ROOT)]
    pub proc_root: PathBuf,

    /// Print the table to stdout instead of opening the terminal display.
    #[arg(long)]
    pub plain: bool,

    /// Print each refresh as one JSON line (implies --plain).
    #[arg(long)]
    pub json: bool,

    /// Append logs to this file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Whether output goes to stdout rather than the terminal display.
    #[must_use]
    pub const fn is_plain(&self) -> bool {
        self.plain || self.json
    }

    /// Builds the session configuration.
    #[must_use]
    pub fn config(&self) -> MonitorConfig {
        MonitorConfig {
            live: self.live,
            interval_secs: self.interval,
            proc_root: self.proc_root.clone(),
        }
    }
}
