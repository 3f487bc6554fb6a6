//! Path layout of the proc filesystem.
//!
//! Every reader in this crate resolves its files through [`ProcFs`] so the
//! whole engine can be pointed at a tree other than `/proc`.

use std::path::{Path, PathBuf};

use tcpwatch_common::constants::{COMM_FILE_NAME, FD_DIR_NAME, TCP_TABLE_PATH};

/// Handle to a proc filesystem root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcFs {
    root: PathBuf,
}

impl ProcFs {
    /// Creates a handle rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/net/tcp`
    #[must_use]
    pub fn tcp_table(&self) -> PathBuf {
        self.root.join(TCP_TABLE_PATH)
    }

    /// `<root>/<pid>`
    #[must_use]
    pub fn pid_dir(&self, pid: u32) -> PathBuf {
        self.root.join(pid.to_string())
    }

    /// `<root>/<pid>/fd`
    #[must_use]
    pub fn fd_dir(&self, pid: u32) -> PathBuf {
        self.pid_dir(pid).join(FD_DIR_NAME)
    }

    /// `<root>/<pid>/comm`
    #[must_use]
    pub fn comm_file(&self, pid: u32) -> PathBuf {
        self.pid_dir(pid).join(COMM_FILE_NAME)
    }
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new(tcpwatch_common::constants::DEFAULT_PROC_ROOT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_match_kernel_layout() {
        let proc = ProcFs::default();
        assert_eq!(proc.tcp_table(), PathBuf::from("/proc/net/tcp"));
        assert_eq!(proc.fd_dir(100), PathBuf::from("/proc/100/fd"));
        assert_eq!(proc.comm_file(100), PathBuf::from("/proc/100/comm"));
    }

    #[test]
    fn custom_root_is_respected() {
        let proc = ProcFs::new("/tmp/fake-proc");
        assert_eq!(proc.root(), Path::new("/tmp/fake-proc"));
        assert_eq!(proc.tcp_table(), PathBuf::from("/tmp/fake-proc/net/tcp"));
    }
}
