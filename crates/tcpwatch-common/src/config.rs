//! Runtime configuration for a monitoring session.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TcpWatchError};

/// Root configuration for a tcpwatch session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Whether to keep refreshing (`true`) or take a single snapshot.
    pub live: bool,
    /// Seconds to wait between refresh ticks.
    pub interval_secs: u64,
    /// Mount point of the proc filesystem to read from.
    pub proc_root: PathBuf,
}

impl MonitorConfig {
    /// Checks that the configuration describes a runnable session.
    ///
    /// # Errors
    ///
    /// Returns [`TcpWatchError::Config`] if the interval is zero or the
    /// proc root is empty.
    pub fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            return Err(TcpWatchError::Config {
                message: "refresh interval must be at least 1 second".into(),
            });
        }
        if self.proc_root.as_os_str().is_empty() {
            return Err(TcpWatchError::Config {
                message: "proc root must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Returns the refresh interval as a [`Duration`].
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            live: true,
            interval_secs: crate::constants::DEFAULT_REFRESH_SECS,
            proc_root: PathBuf::from(crate::constants::DEFAULT_PROC_ROOT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_live_every_two_seconds() {
        let config = MonitorConfig::default();
        assert!(config.live);
        assert_eq!(config.interval(), Duration::from_secs(2));
        assert_eq!(config.proc_root, PathBuf::from("/proc"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = MonitorConfig {
            interval_secs: 0,
            ..MonitorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TcpWatchError::Config { .. })
        ));
    }

    #[test]
    fn empty_proc_root_is_rejected() {
        let config = MonitorConfig {
            proc_root: PathBuf::new(),
            ..MonitorConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
