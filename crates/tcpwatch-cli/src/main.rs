//! # tcpwatch
//!
//! Live terminal view of the kernel TCP table, with each socket attributed
//! to the process that holds it open.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

mod cli;
mod logging;
mod output;

use anyhow::Context;
use clap::Parser;

use crate::cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref(), cli.is_plain())?;

    let config = cli.config();
    config.validate()?;
    let visibility = tcpwatch_core::privilege::warn_if_unprivileged();
    tracing::info!(?config, ?visibility, plain = cli.is_plain(), "starting tcpwatch");

    if cli.is_plain() {
        output::run_plain(&config, cli.json)
    } else {
        tcpwatch_tui::run(&config).context("terminal display failed")
    }
}
