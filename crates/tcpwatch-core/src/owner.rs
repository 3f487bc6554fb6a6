//! Socket-owner correlation.
//!
//! The kernel has no socket-to-PID index, so ownership is recovered by
//! walking every process's `fd/` directory, picking out `socket:[<inode>]`
//! links, and translating each inode to its local address through the TCP
//! table. Processes exit while this runs; anything that disappears or
//! cannot be read is skipped.

use std::collections::HashMap;
use std::io;

use tcpwatch_common::constants::{SOCKET_LINK_PREFIX, UNKNOWN_PROCESS_NAME};
use tcpwatch_common::types::{ProcessInfo, SocketKey};

use crate::procfs::ProcFs;
use crate::table;

/// Socket key to owning process, rebuilt every refresh tick.
///
/// When several descriptors resolve to one key the last one walked wins.
pub type OwnerMap = HashMap<SocketKey, ProcessInfo>;

/// Extracts the inode from an fd link target of the form `socket:[<inode>]`.
#[must_use]
pub fn extract_socket_inode(target: &str) -> Option<u64> {
    target
        .strip_prefix(SOCKET_LINK_PREFIX)?
        .strip_suffix(']')?
        .parse()
        .ok()
}

/// Lists the numeric entries of the proc root.
///
/// An unreadable root yields an empty list.
pub fn list_pids(proc: &ProcFs) -> Vec<u32> {
    let entries = match std::fs::read_dir(proc.root()) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(root = %proc.root().display(), error = %e, "cannot list processes");
            return Vec::new();
        }
    };
    entries
        .flatten()
        .filter_map(|entry| entry.file_name().to_str()?.parse::<u32>().ok())
        .filter(|&pid| pid != 0)
        .collect()
}

/// Reads the short command name of `pid`, or `"Unknown"`.
pub fn read_process_name(proc: &ProcFs, pid: u32) -> String {
    match std::fs::read_to_string(proc.comm_file(pid)) {
        Ok(name) => name.trim().to_owned(),
        Err(e) => {
            tracing::trace!(pid, error = %e, "cannot read process name");
            UNKNOWN_PROCESS_NAME.to_owned()
        }
    }
}

/// Collects the socket inodes held open by `pid`.
///
/// Individual descriptors that vanish or are not sockets are skipped.
///
/// # Errors
///
/// Returns the I/O error if the `fd/` directory itself cannot be listed.
pub fn socket_inodes(proc: &ProcFs, pid: u32) -> io::Result<Vec<u64>> {
    let mut inodes = Vec::new();
    for entry in std::fs::read_dir(proc.fd_dir(pid))? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::trace!(pid, error = %e, "skipping fd entry");
                continue;
            }
        };
        let target = match std::fs::read_link(entry.path()) {
            Ok(target) => target,
            Err(e) => {
                tracing::trace!(pid, fd = ?entry.file_name(), error = %e, "cannot read fd link");
                continue;
            }
        };
        if let Some(inode) = target.to_str().and_then(extract_socket_inode) {
            inodes.push(inode);
        }
    }
    Ok(inodes)
}

/// Builds the owner mapping against a prepared inode index.
pub fn map_socket_owners_with_index(proc: &ProcFs, index: &HashMap<u64, SocketKey>) -> OwnerMap {
    let mut owners = OwnerMap::new();
    let mut scanned = 0_usize;

    for pid in list_pids(proc) {
        let inodes = match socket_inodes(proc, pid) {
            Ok(inodes) => inodes,
            Err(e) => {
                tracing::trace!(pid, error = %e, "skipping process");
                continue;
            }
        };
        scanned += 1;

        let mut name: Option<String> = None;
        for inode in inodes {
            let Some(key) = index.get(&inode) else {
                // udp, unix, or tcp6 socket
                continue;
            };
            let name = name.get_or_insert_with(|| read_process_name(proc, pid));
            let _ = owners.insert(key.clone(), ProcessInfo::new(pid, name.clone()));
        }
    }

    tracing::debug!(processes = scanned, owners = owners.len(), "socket owners mapped");
    owners
}

/// Builds the owner mapping for every process under the proc root.
///
/// Never fails: if the TCP table or the process list cannot be read the
/// mapping is simply empty.
pub fn map_socket_owners(proc: &ProcFs) -> OwnerMap {
    match table::read_inode_index(&proc.tcp_table()) {
        Ok(index) => map_socket_owners_with_index(proc, &index),
        Err(e) => {
            tracing::debug!(error = %e, "no inode index, owners left unresolved");
            OwnerMap::new()
        }
    }
}
