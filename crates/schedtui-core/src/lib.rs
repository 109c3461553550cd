#![forbid(unsafe_code)]

//! Domain model and client-side derivation logic for schedtui.
//!
//! This crate holds everything the terminal controller derives *locally*
//! from engine state: the wire data model, the queue classifier, the
//! statistics presenter, the simulated clock, the execution log, and the
//! notification queue. Nothing here performs I/O; the HTTP contract lives
//! in `schedtui-client` and the update/view loop in the `schedtui` binary.
//!
//! # Key Components
//!
//! - [`ProcessRecord`] / [`QueueType`] - engine-owned process state, held
//!   only as transient read-only copies
//! - [`classify::partition_pending`] - stable foreground/background
//!   partition with starvation flagging
//! - [`StatisticsSummary`] - display-ready statistics with per-field
//!   default substitution
//! - [`SimClock`] - monotonic simulated time, advanced only by confirmed
//!   executed work
//! - [`ExecutionLog`] - append-only log of step outcomes
//! - [`NotificationQueue`] - non-blocking `{severity, message}` channel
//!   consumed by the view layer

pub mod classify;
pub mod clock;
pub mod exec_log;
pub mod notify;
pub mod process;
pub mod stats;

pub use classify::{QueueMember, QueuePartition, STARVATION_THRESHOLD, is_starving, partition_pending};
pub use clock::SimClock;
pub use exec_log::{ExecutionLog, LogEntry};
pub use notify::{Notification, NotificationId, NotificationQueue, Severity};
pub use process::{
    AddReceipt, ExecutedProcess, HistoryEntry, NewProcess, ProcessRecord, QueueType, SaveReceipt,
    StepOutcome,
};
pub use stats::{StatisticsSnapshot, StatisticsSummary};
