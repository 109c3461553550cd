//! Property tests for the client-side derivation logic: the clock-sum
//! invariant, the stable-partition invariant, and the per-field
//! statistics defaulting.

use proptest::prelude::*;

use schedtui_core::{
    ExecutedProcess, ProcessRecord, QueueType, SimClock, StatisticsSnapshot, StatisticsSummary,
    StepOutcome, is_starving, partition_pending,
};
use schedtui_core::classify::STARVATION_THRESHOLD;

fn arb_queue_type() -> impl Strategy<Value = QueueType> {
    prop_oneof![Just(QueueType::Foreground), Just(QueueType::Background)]
}

prop_compose! {
    fn arb_record()(
        pid in 1u64..10_000,
        waiting in 0u64..40,
        burst in 1u64..50,
        remaining in 0u64..50,
        priority in 0u32..10,
        queue in arb_queue_type(),
        completed in any::<bool>(),
    ) -> ProcessRecord {
        ProcessRecord {
            id: None,
            pid,
            name: format!("P{pid}"),
            arrival_time: 0,
            burst_time: burst,
            priority,
            queue_type: queue,
            remaining_time: if completed { 0 } else { remaining },
            waiting_time: waiting,
            turnaround_time: 0,
            completed,
        }
    }
}

fn arb_step() -> impl Strategy<Value = StepOutcome> {
    prop_oneof![
        // Idle tick: no executed-process descriptor.
        Just(StepOutcome {
            process: None,
            queue_type: None,
            message: Some("No processes to execute".to_owned()),
            statistics: StatisticsSnapshot::default(),
        }),
        (1u64..1000, 0u64..20, arb_queue_type()).prop_map(|(pid, duration, queue)| StepOutcome {
            process: Some(ExecutedProcess {
                pid: Some(pid),
                name: format!("P{pid}"),
                execution_time: duration,
                remaining_time: 0,
            }),
            queue_type: Some(queue),
            message: None,
            statistics: StatisticsSnapshot::default(),
        }),
    ]
}

proptest! {
    /// The clock equals the sum of execution times over executed steps
    /// only; idle ticks contribute nothing.
    #[test]
    fn clock_is_sum_of_executed_durations(steps in proptest::collection::vec(arb_step(), 0..64)) {
        let mut clock = SimClock::new();
        let mut expected: u64 = 0;
        for step in &steps {
            if let Some(exec) = &step.process {
                clock.advance(exec.execution_time);
                expected += exec.execution_time;
            }
        }
        prop_assert_eq!(clock.value(), expected);
    }

    /// Partitioning is stable and covers every pending record exactly once.
    #[test]
    fn partition_is_stable_and_exhaustive(records in proptest::collection::vec(arb_record(), 0..64)) {
        let partition = partition_pending(&records);

        let fg_pids: Vec<u64> = partition.foreground.iter().map(|m| m.record.pid).collect();
        let bg_pids: Vec<u64> = partition.background.iter().map(|m| m.record.pid).collect();
        let expected_fg: Vec<u64> = records
            .iter()
            .filter(|r| !r.completed && r.queue_type == QueueType::Foreground)
            .map(|r| r.pid)
            .collect();
        let expected_bg: Vec<u64> = records
            .iter()
            .filter(|r| !r.completed && r.queue_type == QueueType::Background)
            .map(|r| r.pid)
            .collect();

        prop_assert_eq!(fg_pids, expected_fg);
        prop_assert_eq!(bg_pids, expected_bg);

        let pending = records.iter().filter(|r| !r.completed).count();
        prop_assert_eq!(partition.foreground.len() + partition.background.len(), pending);
    }

    /// The starvation flag holds exactly when waiting time exceeds the
    /// threshold, for every classified member.
    #[test]
    fn starvation_flag_matches_threshold(records in proptest::collection::vec(arb_record(), 0..64)) {
        let partition = partition_pending(&records);
        for member in partition.foreground.iter().chain(partition.background.iter()) {
            prop_assert_eq!(member.starving, member.record.waiting_time > STARVATION_THRESHOLD);
            prop_assert_eq!(member.starving, is_starving(member.record.waiting_time));
        }
    }

    /// Every omitted statistics field renders as 0, independent of which
    /// other fields are present.
    #[test]
    fn statistics_default_per_field(
        current_time in proptest::option::of(0u64..1000),
        total in proptest::option::of(0u64..1000),
        completed in proptest::option::of(0u64..1000),
        avg_wait in proptest::option::of(0.0f64..100.0),
    ) {
        let snapshot = StatisticsSnapshot {
            current_time,
            total_processes: total,
            completed_processes: completed,
            avg_waiting_time: avg_wait,
            ..StatisticsSnapshot::default()
        };
        let summary = StatisticsSummary::from_snapshot(&snapshot);
        prop_assert_eq!(summary.current_time, current_time.unwrap_or(0));
        prop_assert_eq!(summary.total_processes, total.unwrap_or(0));
        prop_assert_eq!(summary.completed_processes, completed.unwrap_or(0));
        prop_assert_eq!(summary.avg_waiting_time, avg_wait.unwrap_or(0.0));
        // Fields never supplied are always zero.
        prop_assert_eq!(summary.background_queue_size, 0);
        prop_assert_eq!(summary.starvation_count, 0);
    }
}
