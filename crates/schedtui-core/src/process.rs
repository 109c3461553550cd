#![forbid(unsafe_code)]

//! Wire data model shared with the remote scheduling engine.
//!
//! All process state is owned by the engine; the client holds transient,
//! read-only copies refreshed in full after every mutating action. Fields
//! the engine may omit carry `#[serde(default)]` so a sparse payload
//! deserializes rather than failing the whole refresh.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::stats::StatisticsSnapshot;

/// The queue class a process is scheduled in.
///
/// The engine partitions processes into two priority classes with
/// possibly distinct policies per class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueType {
    Foreground,
    Background,
}

impl QueueType {
    /// Wire/display name, matching the engine's serialization.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Foreground => "foreground",
            Self::Background => "background",
        }
    }

    /// The other queue class.
    pub fn toggled(self) -> Self {
        match self {
            Self::Foreground => Self::Background,
            Self::Background => Self::Foreground,
        }
    }
}

impl fmt::Display for QueueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A process as reported by the engine.
///
/// Invariants are engine-owned: `remaining_time >= 0` and
/// `completed` implies `remaining_time == 0`. The client never
/// transitions this state locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    /// Persistence row id; absent on engines that do not expose it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub pid: u64,
    pub name: String,
    pub arrival_time: u64,
    pub burst_time: u64,
    pub priority: u32,
    pub queue_type: QueueType,
    #[serde(default)]
    pub remaining_time: u64,
    #[serde(default)]
    pub waiting_time: u64,
    #[serde(default)]
    pub turnaround_time: u64,
    #[serde(default)]
    pub completed: bool,
}

/// Request body for the add-process operation.
///
/// The numeric fields are already parsed to integers: non-numeric form
/// input is rejected client-side before a request is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProcess {
    pub name: String,
    pub arrival_time: u64,
    pub burst_time: u64,
    pub priority: u32,
    pub queue_type: QueueType,
}

/// Success body of the add-process operation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddReceipt {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub pid: Option<u64>,
}

/// The executed-process descriptor inside a step response.
///
/// Its presence is what distinguishes a real execution from an idle
/// tick; only then may the simulated clock advance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutedProcess {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u64>,
    pub name: String,
    pub execution_time: u64,
    #[serde(default)]
    pub remaining_time: u64,
}

/// Success body of one step of the simulation.
///
/// `process` absent means the engine had nothing to execute (an idle
/// tick); `message` carries the engine's note for that case. The
/// statistics payload rides along on both shapes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StepOutcome {
    #[serde(default)]
    pub process: Option<ExecutedProcess>,
    #[serde(default)]
    pub queue_type: Option<QueueType>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub statistics: StatisticsSnapshot,
}

impl StepOutcome {
    /// Whether this step actually executed a process.
    pub fn executed(&self) -> bool {
        self.process.is_some()
    }
}

/// Success body of the save-results operation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SaveReceipt {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub results: StatisticsSnapshot,
}

/// One saved simulation run, immutable, rendered verbatim.
///
/// Entries arrive in engine order; the client does not re-sort.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub total_processes: u64,
    #[serde(default)]
    pub completed_processes: u64,
    #[serde(default)]
    pub avg_waiting_time: f64,
    #[serde(default)]
    pub avg_turnaround_time: f64,
    #[serde(default)]
    pub starvation_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_type_round_trips_lowercase() {
        let fg: QueueType = serde_json::from_str("\"foreground\"").unwrap();
        assert_eq!(fg, QueueType::Foreground);
        assert_eq!(serde_json::to_string(&QueueType::Background).unwrap(), "\"background\"");
    }

    #[test]
    fn step_outcome_idle_shape_decodes() {
        // Idle tick: no `process` field, message plus statistics only.
        let outcome: StepOutcome = serde_json::from_str(
            r#"{"message": "No processes to execute", "statistics": {"current_time": 7}}"#,
        )
        .unwrap();
        assert!(!outcome.executed());
        assert_eq!(outcome.queue_type, None);
        assert_eq!(outcome.statistics.current_time, Some(7));
    }

    #[test]
    fn step_outcome_executed_shape_decodes() {
        let outcome: StepOutcome = serde_json::from_str(
            r#"{
                "process": {"pid": 3, "name": "P1", "execution_time": 4, "remaining_time": 2},
                "queue_type": "foreground",
                "statistics": {}
            }"#,
        )
        .unwrap();
        assert!(outcome.executed());
        let exec = outcome.process.unwrap();
        assert_eq!(exec.name, "P1");
        assert_eq!(exec.execution_time, 4);
        assert_eq!(outcome.queue_type, Some(QueueType::Foreground));
    }

    #[test]
    fn empty_step_body_is_an_idle_tick() {
        let outcome: StepOutcome = serde_json::from_str("{}").unwrap();
        assert!(!outcome.executed());
    }

    #[test]
    fn process_record_tolerates_sparse_payload() {
        let record: ProcessRecord = serde_json::from_str(
            r#"{"pid": 1, "name": "init", "arrival_time": 0, "burst_time": 9,
                "priority": 1, "queue_type": "background"}"#,
        )
        .unwrap();
        assert_eq!(record.remaining_time, 0);
        assert_eq!(record.waiting_time, 0);
        assert!(!record.completed);
        assert_eq!(record.id, None);
    }
}
