//! Kernel TCP connection table reader.
//!
//! Decodes the line-oriented `/proc/net/tcp` format into [`TcpConnection`]
//! records. The table can change while it is being read, so a row that
//! fails to decode is skipped and reported at `trace` level; only a table
//! that cannot be read at all is an error.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::path::Path;

use tcpwatch_common::constants::MIN_TABLE_FIELDS;
use tcpwatch_common::error::{Result, TcpWatchError};
use tcpwatch_common::types::{SocketKey, TcpConnection, TcpState};
use thiserror::Error;

/// One decoded table row: the connection plus its socket inode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// The connection, owner fields unset.
    pub connection: TcpConnection,
    /// Socket inode from field 9, `None` if it did not parse.
    pub inode: Option<u64>,
}

/// Why a table row was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// Fewer than ten whitespace-delimited fields.
    #[error("expected at least 10 fields, found {0}")]
    TooFewFields(usize),
    /// Field 1 is not `<8 hex>:<hex port>`.
    #[error("undecodable local address {0:?}")]
    BadLocalAddress(String),
    /// Field 2 is not `<8 hex>:<hex port>`.
    #[error("undecodable remote address {0:?}")]
    BadRemoteAddress(String),
}

fn is_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Decodes a `"<8 hex digit little-endian IPv4>:<hex port>"` field.
///
/// ```
/// use std::net::Ipv4Addr;
/// use tcpwatch_core::table::parse_address;
///
/// assert_eq!(parse_address("0100007F:0050"), Some((Ipv4Addr::LOCALHOST, 80)));
/// ```
#[must_use]
pub fn parse_address(field: &str) -> Option<(Ipv4Addr, u16)> {
    let (ip_hex, port_hex) = field.split_once(':')?;
    if ip_hex.len() != 8 || !is_hex(ip_hex) || port_hex.len() > 4 || !is_hex(port_hex) {
        return None;
    }
    let raw = u32::from_str_radix(ip_hex, 16).ok()?;
    let port = u16::from_str_radix(port_hex, 16).ok()?;
    Some((Ipv4Addr::from(raw.to_le_bytes()), port))
}

/// Encodes an address the way the kernel writes it in the table.
#[must_use]
pub fn encode_address(address: Ipv4Addr, port: u16) -> String {
    format!("{:08X}:{port:04X}", u32::from_le_bytes(address.octets()))
}

/// Decodes one data row of the table.
///
/// # Errors
///
/// Returns the [`SkipReason`] when the row cannot produce a connection.
pub fn parse_line(line: &str) -> std::result::Result<TableRow, SkipReason> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < MIN_TABLE_FIELDS {
        return Err(SkipReason::TooFewFields(fields.len()));
    }

    let (local_address, local_port) = parse_address(fields[1])
        .ok_or_else(|| SkipReason::BadLocalAddress(fields[1].to_owned()))?;
    let (remote_address, remote_port) = parse_address(fields[2])
        .ok_or_else(|| SkipReason::BadRemoteAddress(fields[2].to_owned()))?;
    let state = TcpState::from_hex(fields[3]);

    Ok(TableRow {
        connection: TcpConnection::new(
            local_address,
            local_port,
            remote_address,
            remote_port,
            state,
        ),
        inode: fields[9].parse().ok(),
    })
}

/// Decodes a whole table, header included, in table order.
#[must_use]
pub fn parse_table(content: &str) -> Vec<TableRow> {
    content
        .lines()
        .enumerate()
        .skip(1)
        .filter_map(|(index, line)| match parse_line(line) {
            Ok(row) => Some(row),
            Err(reason) => {
                tracing::trace!(line = index + 1, %reason, "skipping tcp table row");
                None
            }
        })
        .collect()
}

fn read_table(path: &Path) -> Result<Vec<TableRow>> {
    let content = std::fs::read_to_string(path).map_err(|e| TcpWatchError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(parse_table(&content))
}

/// Reads the connection table at `path`.
///
/// # Errors
///
/// Returns [`TcpWatchError::Io`] if the table cannot be opened or read.
pub fn read_connections(path: &Path) -> Result<Vec<TcpConnection>> {
    let connections: Vec<_> = read_table(path)?
        .into_iter()
        .map(|row| row.connection)
        .collect();
    tracing::debug!(path = %path.display(), count = connections.len(), "read tcp table");
    Ok(connections)
}

/// Builds an inode to local-socket index from one scan of the table.
///
/// When an inode appears more than once the first row wins, matching a
/// top-down search of the table.
///
/// # Errors
///
/// Returns [`TcpWatchError::Io`] if the table cannot be opened or read.
pub fn read_inode_index(path: &Path) -> Result<HashMap<u64, SocketKey>> {
    let mut index = HashMap::new();
    for row in read_table(path)? {
        // TIME_WAIT and orphaned rows carry inode 0, which no fd links to.
        let Some(inode) = row.inode.filter(|&inode| inode != 0) else {
            continue;
        };
        let _ = index
            .entry(inode)
            .or_insert_with(|| row.connection.socket_key());
    }
    Ok(index)
}
