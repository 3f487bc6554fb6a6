//! Tracing subscriber setup.
//!
//! The interactive display owns the terminal, so logs only reach stderr in
//! `--plain` mode. Otherwise they go to `--log-file` or are discarded.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Installs the global subscriber. `RUST_LOG` overrides the `warn` default.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init(log_file: Option<&Path>, plain: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (writer, ansi) = match log_file {
        Some(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None if plain => (BoxMakeWriter::new(std::io::stderr), true),
        None => (BoxMakeWriter::new(std::io::sink), false),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .init();
    Ok(())
}
