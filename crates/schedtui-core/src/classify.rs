#![forbid(unsafe_code)]

//! Queue classification and starvation flagging.
//!
//! A pure derivation over the authoritative process list: the pending
//! subset is split into the two queue classes, preserving the engine's
//! reported order within each class, and every member carries a
//! starvation flag. Rendering is layered on top elsewhere; nothing here
//! touches the terminal.

use crate::process::{ProcessRecord, QueueType};

/// Waiting time above which a process is flagged as starving.
///
/// Fixed policy constant; the comparison is strict (`waiting_time > 10`).
pub const STARVATION_THRESHOLD: u64 = 10;

/// Whether a process with this accumulated waiting time is starving.
///
/// Applies to completed and pending records alike; the queue display
/// additionally excludes completed records, but the process table flags
/// every row by this predicate.
#[inline]
#[must_use]
pub fn is_starving(waiting_time: u64) -> bool {
    waiting_time > STARVATION_THRESHOLD
}

/// One pending process in a queue display, with its starvation flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueueMember<'a> {
    pub record: &'a ProcessRecord,
    pub starving: bool,
}

/// The pending process list split by queue class.
///
/// An empty class is an explicit empty vector, distinct from a failed or
/// missing refresh (which never produces a partition at all).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueuePartition<'a> {
    pub foreground: Vec<QueueMember<'a>>,
    pub background: Vec<QueueMember<'a>>,
}

impl<'a> QueuePartition<'a> {
    /// Members of the given class, in input order.
    pub fn class(&self, queue: QueueType) -> &[QueueMember<'a>] {
        match queue {
            QueueType::Foreground => &self.foreground,
            QueueType::Background => &self.background,
        }
    }
}

/// Stable partition of the non-completed records by queue class.
///
/// Relative order within each class matches the input order; no other
/// key is consulted. Every non-completed record lands in exactly one
/// class; completed records are dropped from queue display entirely.
#[must_use]
pub fn partition_pending(records: &[ProcessRecord]) -> QueuePartition<'_> {
    let mut partition = QueuePartition::default();
    for record in records.iter().filter(|r| !r.completed) {
        let member = QueueMember {
            record,
            starving: is_starving(record.waiting_time),
        };
        match record.queue_type {
            QueueType::Foreground => partition.foreground.push(member),
            QueueType::Background => partition.background.push(member),
        }
    }
    partition
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pid: u64, queue: QueueType, waiting: u64, completed: bool) -> ProcessRecord {
        ProcessRecord {
            id: None,
            pid,
            name: format!("P{pid}"),
            arrival_time: 0,
            burst_time: 5,
            priority: 1,
            queue_type: queue,
            remaining_time: if completed { 0 } else { 5 },
            waiting_time: waiting,
            turnaround_time: 0,
            completed,
        }
    }

    #[test]
    fn completed_records_are_excluded() {
        let records = vec![
            record(1, QueueType::Foreground, 0, true),
            record(2, QueueType::Background, 0, true),
        ];
        let partition = partition_pending(&records);
        assert!(partition.foreground.is_empty());
        assert!(partition.background.is_empty());
    }

    #[test]
    fn partition_is_stable() {
        let records = vec![
            record(3, QueueType::Background, 0, false),
            record(1, QueueType::Foreground, 0, false),
            record(4, QueueType::Foreground, 0, false),
            record(2, QueueType::Background, 0, false),
        ];
        let partition = partition_pending(&records);
        let fg: Vec<u64> = partition.foreground.iter().map(|m| m.record.pid).collect();
        let bg: Vec<u64> = partition.background.iter().map(|m| m.record.pid).collect();
        assert_eq!(fg, [1, 4]);
        assert_eq!(bg, [3, 2]);
    }

    #[test]
    fn starvation_threshold_is_strict() {
        assert!(!is_starving(10));
        assert!(is_starving(11));
        let records = vec![
            record(1, QueueType::Foreground, 10, false),
            record(2, QueueType::Foreground, 11, false),
        ];
        let partition = partition_pending(&records);
        assert!(!partition.foreground[0].starving);
        assert!(partition.foreground[1].starving);
    }

    #[test]
    fn empty_input_yields_explicit_empty_classes() {
        let partition = partition_pending(&[]);
        assert_eq!(partition.class(QueueType::Foreground).len(), 0);
        assert_eq!(partition.class(QueueType::Background).len(), 0);
    }
}
