//! Domain primitive types used across the tcpwatch workspace.

use std::fmt;
use std::net::Ipv4Addr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Join key between a TCP table row and a process's open socket.
///
/// Always rendered as `"<dotted-quad>:<decimal port>"`. Both sides of the
/// join build it through [`SocketKey::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SocketKey(String);

impl SocketKey {
    /// Creates the key for a local address and port.
    #[must_use]
    pub fn new(address: Ipv4Addr, port: u16) -> Self {
        Self(format!("{address}:{port}"))
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SocketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// TCP connection state as reported in the kernel table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TcpState {
    /// `01`
    Established,
    /// `02`
    SynSent,
    /// `03`
    SynRecv,
    /// `04`
    FinWait1,
    /// `05`
    FinWait2,
    /// `06`
    TimeWait,
    /// `07`
    Close,
    /// `08`
    CloseWait,
    /// `09`
    LastAck,
    /// `0A`
    Listen,
    /// `0B`
    Closing,
    /// Any code outside `01..=0B`.
    Unknown,
}

impl TcpState {
    /// Decodes the two-digit hex state code from the kernel table.
    ///
    /// Unrecognized codes map to [`TcpState::Unknown`] instead of failing.
    #[must_use]
    pub fn from_hex(code: &str) -> Self {
        if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Self::Unknown;
        }
        match u8::from_str_radix(code, 16) {
            Ok(0x01) => Self::Established,
            Ok(0x02) => Self::SynSent,
            Ok(0x03) => Self::SynRecv,
            Ok(0x04) => Self::FinWait1,
            Ok(0x05) => Self::FinWait2,
            Ok(0x06) => Self::TimeWait,
            Ok(0x07) => Self::Close,
            Ok(0x08) => Self::CloseWait,
            Ok(0x09) => Self::LastAck,
            Ok(0x0A) => Self::Listen,
            Ok(0x0B) => Self::Closing,
            _ => Self::Unknown,
        }
    }

    /// Returns the kernel name of the state, empty for unknown codes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Established => "ESTABLISHED",
            Self::SynSent => "SYN_SENT",
            Self::SynRecv => "SYN_RECV",
            Self::FinWait1 => "FIN_WAIT1",
            Self::FinWait2 => "FIN_WAIT2",
            Self::TimeWait => "TIME_WAIT",
            Self::Close => "CLOSE",
            Self::CloseWait => "CLOSE_WAIT",
            Self::LastAck => "LAST_ACK",
            Self::Listen => "LISTEN",
            Self::Closing => "CLOSING",
            Self::Unknown => "",
        }
    }
}

impl fmt::Display for TcpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One observed TCP connection at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TcpConnection {
    /// Local IPv4 address.
    pub local_address: Ipv4Addr,
    /// Local port.
    pub local_port: u16,
    /// Remote IPv4 address.
    pub remote_address: Ipv4Addr,
    /// Remote port.
    pub remote_port: u16,
    /// Connection state.
    pub state: TcpState,
    /// PID of the owning process, 0 if unresolved.
    pub owner_pid: u32,
    /// Command name of the owning process, empty if unresolved.
    pub owner_name: String,
}

impl TcpConnection {
    /// Creates a connection with no owner attached.
    #[must_use]
    pub const fn new(
        local_address: Ipv4Addr,
        local_port: u16,
        remote_address: Ipv4Addr,
        remote_port: u16,
        state: TcpState,
    ) -> Self {
        Self {
            local_address,
            local_port,
            remote_address,
            remote_port,
            state,
            owner_pid: 0,
            owner_name: String::new(),
        }
    }

    /// Returns the join key of the local end of this connection.
    #[must_use]
    pub fn socket_key(&self) -> SocketKey {
        SocketKey::new(self.local_address, self.local_port)
    }

    /// Records the owning process.
    pub fn set_owner(&mut self, owner: &ProcessInfo) {
        self.owner_pid = owner.pid;
        self.owner_name.clone_from(&owner.name);
    }

    /// Whether an owning process was found for this connection.
    #[must_use]
    pub const fn has_owner(&self) -> bool {
        self.owner_pid != 0
    }
}

/// A process that holds a socket open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInfo {
    /// Process identifier.
    pub pid: u32,
    /// Short command name from `comm`.
    pub name: String,
}

impl ProcessInfo {
    /// Creates a new process record.
    #[must_use]
    pub fn new(pid: u32, name: impl Into<String>) -> Self {
        Self {
            pid,
            name: name.into(),
        }
    }
}

/// Outcome of one refresh tick, handed to whatever renders it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    /// The table was read and joined against the owner mapping.
    Table {
        /// Connections in kernel table order.
        connections: Vec<TcpConnection>,
        /// When the tick ran.
        taken_at: DateTime<Local>,
    },
    /// The connection table could not be read at all.
    Error {
        /// Human-readable description of the failure.
        message: String,
        /// When the tick ran.
        taken_at: DateTime<Local>,
    },
}

impl Report {
    /// Returns when the tick that produced this report ran.
    #[must_use]
    pub const fn taken_at(&self) -> &DateTime<Local> {
        match self {
            Self::Table { taken_at, .. } | Self::Error { taken_at, .. } => taken_at,
        }
    }

    /// Whether this report carries an error instead of a table.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn socket_key_uses_dotted_quad_and_decimal_port() {
        let key = SocketKey::new(Ipv4Addr::new(127, 0, 0, 1), 8080);
        assert_eq!(key.as_str(), "127.0.0.1:8080");
        assert_eq!(key.to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn every_documented_state_code_maps_to_its_name() {
        let table = [
            ("01", "ESTABLISHED"),
            ("02", "SYN_SENT"),
            ("03", "SYN_RECV"),
            ("04", "FIN_WAIT1"),
            ("05", "FIN_WAIT2"),
            ("06", "TIME_WAIT"),
            ("07", "CLOSE"),
            ("08", "CLOSE_WAIT"),
            ("09", "LAST_ACK"),
            ("0A", "LISTEN"),
            ("0B", "CLOSING"),
        ];
        for (code, name) in table {
            assert_eq!(TcpState::from_hex(code).as_str(), name, "code {code}");
        }
    }

    #[test]
    fn state_codes_are_case_insensitive() {
        assert_eq!(TcpState::from_hex("0a"), TcpState::Listen);
        assert_eq!(TcpState::from_hex("0b"), TcpState::Closing);
    }

    #[test]
    fn unrecognized_state_codes_are_unknown() {
        for code in ["00", "0C", "FF", "", "1", "001", "zz", "+1"] {
            assert_eq!(TcpState::from_hex(code), TcpState::Unknown, "code {code:?}");
        }
        assert_eq!(TcpState::Unknown.to_string(), "");
    }

    #[test]
    fn state_display_honors_padding() {
        assert_eq!(format!("{:<12}|", TcpState::Listen), "LISTEN      |");
    }

    #[test]
    fn new_connection_has_no_owner() {
        let conn = TcpConnection::new(
            Ipv4Addr::LOCALHOST,
            22,
            Ipv4Addr::UNSPECIFIED,
            0,
            TcpState::Listen,
        );
        assert_eq!(conn.owner_pid, 0);
        assert!(conn.owner_name.is_empty());
        assert!(!conn.has_owner());
        assert_eq!(conn.socket_key().as_str(), "127.0.0.1:22");
    }

    #[test]
    fn set_owner_fills_both_fields() {
        let mut conn = TcpConnection::new(
            Ipv4Addr::LOCALHOST,
            8080,
            Ipv4Addr::UNSPECIFIED,
            0,
            TcpState::Listen,
        );
        conn.set_owner(&ProcessInfo::new(42, "nginx"));
        assert_eq!(conn.owner_pid, 42);
        assert_eq!(conn.owner_name, "nginx");
    }

    #[test]
    fn report_serializes_with_kind_tag() {
        let report = Report::Error {
            message: "boom".into(),
            taken_at: Local::now(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "error");
        assert_eq!(json["message"], "boom");
        assert!(report.is_error());
    }
}
