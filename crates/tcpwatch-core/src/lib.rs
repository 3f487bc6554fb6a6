//! # tcpwatch-core
//!
//! The procfs engine behind tcpwatch.
//!
//! This crate provides:
//! - **Table reader**: decodes `/proc/net/tcp` into typed connections.
//! - **Owner correlation**: walks `/proc/<pid>/fd` to map sockets to processes.
//! - **Report**: joins the two and formats the fixed-width table.
//! - **Refresh driver**: repeats ticks on an interval with cooperative cancellation.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod owner;
pub mod privilege;
pub mod procfs;
pub mod refresh;
pub mod report;
pub mod table;

pub use procfs::ProcFs;
pub use refresh::{CancellationToken, RefreshHandle, RefreshLoop};
pub use report::{fetch_and_format, fetch_report};
