#![forbid(unsafe_code)]

//! Statistics snapshot and its display presenter.
//!
//! The engine's statistics payload is treated as sparse: every field is
//! optional on the wire, and a success payload with fields missing is not
//! an error. The presenter substitutes the literal `0` per field,
//! independently; one absent average never blanks the counters next to it.

use serde::{Deserialize, Serialize};

/// Statistics as reported by the engine, every field optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_processes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_processes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground_queue_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_queue_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_waiting_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_turnaround_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starvation_count: Option<u64>,
}

/// A fully populated, display-ready statistics record.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatisticsSummary {
    pub current_time: u64,
    pub total_processes: u64,
    pub completed_processes: u64,
    pub foreground_queue_size: u64,
    pub background_queue_size: u64,
    pub avg_waiting_time: f64,
    pub avg_turnaround_time: f64,
    pub starvation_count: u64,
}

impl StatisticsSummary {
    /// Fill every absent field with `0`, each one independently.
    #[must_use]
    pub fn from_snapshot(snapshot: &StatisticsSnapshot) -> Self {
        Self {
            current_time: snapshot.current_time.unwrap_or(0),
            total_processes: snapshot.total_processes.unwrap_or(0),
            completed_processes: snapshot.completed_processes.unwrap_or(0),
            foreground_queue_size: snapshot.foreground_queue_size.unwrap_or(0),
            background_queue_size: snapshot.background_queue_size.unwrap_or(0),
            avg_waiting_time: snapshot.avg_waiting_time.unwrap_or(0.0),
            avg_turnaround_time: snapshot.avg_turnaround_time.unwrap_or(0.0),
            starvation_count: snapshot.starvation_count.unwrap_or(0),
        }
    }
}

impl From<&StatisticsSnapshot> for StatisticsSummary {
    fn from(snapshot: &StatisticsSnapshot) -> Self {
        Self::from_snapshot(snapshot)
    }
}
