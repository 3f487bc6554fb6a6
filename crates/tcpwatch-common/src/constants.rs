//! System-wide constants and default paths.

/// Default mount point of the proc filesystem.
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Kernel IPv4 TCP table, relative to the proc root.
pub const TCP_TABLE_PATH: &str = "net/tcp";

/// Per-process file descriptor directory name.
pub const FD_DIR_NAME: &str = "fd";

/// Per-process short command name file.
pub const COMM_FILE_NAME: &str = "comm";

/// Prefix of an fd symlink target that refers to a socket.
pub const SOCKET_LINK_PREFIX: &str = "socket:[";

/// Minimum number of whitespace-delimited fields in a TCP table row.
pub const MIN_TABLE_FIELDS: usize = 10;

/// Process name used when `comm` cannot be read.
pub const UNKNOWN_PROCESS_NAME: &str = "Unknown";

/// Default refresh interval in seconds.
pub const DEFAULT_REFRESH_SECS: u64 = 2;

/// Column widths of the rendered table, final column unpadded.
pub const COLUMN_WIDTHS: [usize; 6] = [20, 8, 20, 8, 12, 8];

/// Width of the separator line under the table header.
pub const SEPARATOR_WIDTH: usize = 90;

/// Title of the terminal display.
pub const APP_TITLE: &str = "TCP Monitor";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "tcpwatch";
