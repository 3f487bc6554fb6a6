//! Join and fixed-width formatting of one refresh tick.

use std::fmt::Write as _;

use chrono::Local;
use tcpwatch_common::constants::{COLUMN_WIDTHS, SEPARATOR_WIDTH};
use tcpwatch_common::types::{Report, TcpConnection};

use crate::owner::{self, OwnerMap};
use crate::procfs::ProcFs;
use crate::table;

/// Prefix of the inline message shown when the table cannot be read.
pub const READ_ERROR_PREFIX: &str = "Error reading TCP connections";

/// Column titles, in display order.
pub const COLUMN_TITLES: [&str; 7] = [
    "Local Address",
    "L-Port",
    "Remote Address",
    "R-Port",
    "State",
    "PID",
    "Process",
];

/// Fills the owner fields of every connection whose local key is mapped.
pub fn join_owners(connections: &mut [TcpConnection], owners: &OwnerMap) {
    for conn in connections.iter_mut() {
        if let Some(owner) = owners.get(&conn.socket_key()) {
            conn.set_owner(owner);
        }
    }
}

/// Formats the header row.
#[must_use]
pub fn format_header() -> String {
    let [addr, port, raddr, rport, state, pid] = COLUMN_WIDTHS;
    let [t0, t1, t2, t3, t4, t5, t6] = COLUMN_TITLES;
    format!("{t0:<addr$} {t1:<port$} {t2:<raddr$} {t3:<rport$} {t4:<state$} {t5:<pid$} {t6}")
}

/// Formats the dashed line shown under the header.
#[must_use]
pub fn format_separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

/// Formats one connection as a fixed-width row.
#[must_use]
pub fn format_row(conn: &TcpConnection) -> String {
    let [addr, port, raddr, rport, state, pid] = COLUMN_WIDTHS;
    format!(
        "{:<addr$} {:<port$} {:<raddr$} {:<rport$} {:<state$} {:<pid$} {}",
        conn.local_address,
        conn.local_port,
        conn.remote_address,
        conn.remote_port,
        conn.state,
        conn.owner_pid,
        conn.owner_name,
    )
}

/// Formats the header, separator, and one row per connection.
#[must_use]
pub fn format_table(connections: &[TcpConnection]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", format_header());
    let _ = writeln!(out, "{}", format_separator());
    for conn in connections {
        let _ = writeln!(out, "{}", format_row(conn));
    }
    out
}

/// Runs one refresh tick: read, correlate, join.
///
/// A table that cannot be read produces [`Report::Error`]; nothing else
/// does.
pub fn fetch_report(proc: &ProcFs) -> Report {
    let taken_at = Local::now();
    match table::read_connections(&proc.tcp_table()) {
        Ok(mut connections) => {
            let owners = owner::map_socket_owners(proc);
            join_owners(&mut connections, &owners);
            tracing::debug!(
                connections = connections.len(),
                owned = connections.iter().filter(|c| c.has_owner()).count(),
                "refresh tick complete"
            );
            Report::Table {
                connections,
                taken_at,
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "tcp table unavailable");
            Report::Error {
                message: format!("{READ_ERROR_PREFIX}: {e}"),
                taken_at,
            }
        }
    }
}

/// Renders a report as display text.
#[must_use]
pub fn render_report(report: &Report) -> String {
    match report {
        Report::Table { connections, .. } => format_table(connections),
        Report::Error { message, .. } => format!("{message}\n"),
    }
}

/// Runs one tick and returns the formatted table or the inline error.
pub fn fetch_and_format(proc: &ProcFs) -> String {
    render_report(&fetch_report(proc))
}
