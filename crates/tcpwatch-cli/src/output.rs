//! Plain stdout output for `--plain` and `--json`.

use std::io::{self, Write};

use anyhow::Context;
use tcpwatch_common::config::MonitorConfig;
use tcpwatch_common::types::Report;
use tcpwatch_core::report::render_report;
use tcpwatch_core::{CancellationToken, RefreshLoop};

/// Writes one report as the fixed-width table or as a JSON line.
///
/// # Errors
///
/// Returns an error if writing or serializing fails.
pub fn write_report<W: Write>(out: &mut W, report: &Report, json: bool) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer(&mut *out, report)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", render_report(report))?;
        if report.is_error() {
            tracing::debug!("table read failed, error shown inline");
        }
    }
    out.flush()?;
    Ok(())
}

/// Runs the refresh loop printing to stdout until Ctrl+C.
///
/// # Errors
///
/// Returns an error if the Ctrl+C handler cannot be installed or stdout
/// cannot be written.
pub fn run_plain(config: &MonitorConfig, json: bool) -> anyhow::Result<()> {
    let token = CancellationToken::new();
    let handler_token = token.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .context("failed to install Ctrl+C handler")?;

    let stdout = io::stdout();
    let mut failure = None;
    let ticks = RefreshLoop::new(config).run(&token, |report| {
        let mut out = stdout.lock();
        let written = write_report(&mut out, &report, json).and_then(|()| {
            if config.live && !json {
                writeln!(out)?;
            }
            Ok(())
        });
        if let Err(e) = written {
            failure = Some(e);
            token.cancel();
        }
    });
    tracing::debug!(ticks, "plain output finished");

    failure.map_or(Ok(()), |e| Err(e.context("cannot write to stdout")))
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use chrono::Local;
    use tcpwatch_common::types::{ProcessInfo, TcpConnection, TcpState};

    use super::*;

    fn sample() -> Report {
        let mut conn = TcpConnection::new(
            Ipv4Addr::LOCALHOST,
            8080,
            Ipv4Addr::UNSPECIFIED,
            0,
            TcpState::Listen,
        );
        conn.set_owner(&ProcessInfo::new(100, "demo"));
        Report::Table {
            connections: vec![conn],
            taken_at: Local::now(),
        }
    }

    #[test]
    fn plain_output_is_the_formatted_table() {
        let mut out = Vec::new();
        write_report(&mut out, &sample(), false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().nth(2).unwrap().ends_with("LISTEN       100      demo"));
    }

    #[test]
    fn json_output_is_one_line_per_report() {
        let mut out = Vec::new();
        write_report(&mut out, &sample(), true).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);

        let value: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(value["kind"], "table");
        assert_eq!(value["connections"][0]["local_address"], "127.0.0.1");
        assert_eq!(value["connections"][0]["owner_pid"], 100);
        assert_eq!(value["connections"][0]["state"], "Listen");
    }

    #[test]
    fn error_report_is_written_inline() {
        let mut out = Vec::new();
        let report = Report::Error {
            message: "Error reading TCP connections: gone".into(),
            taken_at: Local::now(),
        };
        write_report(&mut out, &report, false).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Error reading TCP connections: gone\n"
        );
    }
}
