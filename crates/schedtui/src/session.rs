#![forbid(unsafe_code)]

//! The simulation session: the step controller and its companions.
//!
//! [`Session`] owns everything the operator sees — the simulated clock,
//! the execution log, the notification queue, and the latest engine
//! snapshots — and is the only writer of each. User intents resolve
//! through an explicit dispatch table ([`Session::dispatch`]) into
//! commands; every mutating action is followed by a full re-fetch of the
//! affected engine state rather than a local patch, because the engine
//! is the sole source of truth.
//!
//! # Step state machine
//!
//! `Idle → StepRequested → {StepApplied | StepFailed} → Idle`. A step
//! intent while one is in flight is dropped (see DESIGN.md): the guard
//! flag flips on dispatch and clears when the outcome message arrives.
//! On `StepApplied` the log line records the *pre-advance* clock value;
//! only an executed-process outcome advances the clock. On `StepFailed`
//! nothing moves: the operator sees one notification and may retry.

use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, info, warn};

use schedtui_client::{ApiError, EngineClient};
use schedtui_core::notify::DEFAULT_NOTIFICATION_TTL;
use schedtui_core::{
    AddReceipt, ExecutionLog, HistoryEntry, NotificationQueue, ProcessRecord, QueueType,
    SaveReceipt, Severity, SimClock, StatisticsSnapshot, StatisticsSummary, StepOutcome,
};

use crate::form::{FormField, ProcessForm};
use crate::runtime::{Cmd, Model};

// Per-action fallback messages, used when the engine supplies no error text.
const FALLBACK_ADD: &str = "Error adding process";
const FALLBACK_START: &str = "Error starting simulation";
const FALLBACK_STEP: &str = "Error executing simulation step";
const FALLBACK_SAVE: &str = "Error saving simulation results";
const FALLBACK_RESET: &str = "Error resetting simulation";
const FALLBACK_HISTORY: &str = "Error loading simulation history";

/// A user intent, produced by the key map and resolved by
/// [`Session::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AddProcess,
    StartSimulation,
    StepSimulation,
    SaveResults,
    ResetSimulation,
    LoadHistory,
    FocusForm,
    Quit,
}

/// Key bindings for the action pane. One finite table, no ambient
/// callbacks.
pub const KEYMAP: &[(char, Action)] = &[
    ('a', Action::FocusForm),
    ('s', Action::StartSimulation),
    ('n', Action::StepSimulation),
    (' ', Action::StepSimulation),
    ('v', Action::SaveResults),
    ('r', Action::ResetSimulation),
    ('h', Action::LoadHistory),
    ('q', Action::Quit),
];

/// Which region receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Actions,
    Form,
}

/// Everything that can change session state.
#[derive(Debug)]
pub enum Msg {
    Key(KeyEvent),
    ProcessesLoaded(Result<Vec<ProcessRecord>, ApiError>),
    StatisticsLoaded(Result<StatisticsSnapshot, ApiError>),
    StepFinished(Result<StepOutcome, ApiError>),
    AddFinished(Result<AddReceipt, ApiError>),
    StartFinished(Result<(), ApiError>),
    SaveFinished(Result<SaveReceipt, ApiError>),
    ResetFinished(Result<(), ApiError>),
    HistoryLoaded(Result<Vec<HistoryEntry>, ApiError>),
    Noop,
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => Msg::Key(key),
            _ => Msg::Noop,
        }
    }
}

/// The controller's state, owned by the update loop.
pub struct Session {
    client: Arc<EngineClient>,
    pub clock: SimClock,
    pub log: ExecutionLog,
    pub notices: NotificationQueue,
    pub processes: Vec<ProcessRecord>,
    pub stats: StatisticsSummary,
    /// `None` until the operator first loads history; `Some(vec![])` is
    /// the engine's explicit "no saved runs" answer and renders as such.
    pub history: Option<Vec<HistoryEntry>>,
    pub form: ProcessForm,
    pub focus: Focus,
    step_in_flight: bool,
}

impl Session {
    #[must_use]
    pub fn new(client: EngineClient) -> Self {
        Self {
            client: Arc::new(client),
            clock: SimClock::new(),
            log: ExecutionLog::new(),
            notices: NotificationQueue::new(),
            processes: Vec::new(),
            stats: StatisticsSummary::default(),
            history: None,
            form: ProcessForm::new(),
            focus: Focus::Actions,
            step_in_flight: false,
        }
    }

    /// The engine base URL, for the header line.
    pub fn engine_url(&self) -> &str {
        self.client.base_url()
    }

    /// Whether a step request is currently outstanding.
    pub fn step_in_flight(&self) -> bool {
        self.step_in_flight
    }

    /// Resolve a user intent into its side effect. This is the single
    /// seam between intent and controller operation.
    pub fn dispatch(&mut self, action: Action) -> Cmd<Msg> {
        match action {
            Action::AddProcess => self.submit_form(),
            Action::StartSimulation => {
                let client = self.client.clone();
                Cmd::task(move || Msg::StartFinished(client.start()))
            }
            Action::StepSimulation => {
                if self.step_in_flight {
                    debug!("step already in flight, intent dropped");
                    return Cmd::none();
                }
                self.step_in_flight = true;
                let client = self.client.clone();
                Cmd::task(move || Msg::StepFinished(client.step()))
            }
            Action::SaveResults => {
                let client = self.client.clone();
                Cmd::task(move || Msg::SaveFinished(client.save()))
            }
            Action::ResetSimulation => {
                let client = self.client.clone();
                Cmd::task(move || Msg::ResetFinished(client.reset()))
            }
            Action::LoadHistory => {
                let client = self.client.clone();
                Cmd::task(move || Msg::HistoryLoaded(client.history()))
            }
            Action::FocusForm => {
                self.focus = Focus::Form;
                Cmd::none()
            }
            Action::Quit => Cmd::quit(),
        }
    }

    /// Re-fetch the authoritative process list. Issued after every
    /// mutating action; displayed process state is never assumed
    /// consistent otherwise.
    fn refresh_processes(&self) -> Cmd<Msg> {
        let client = self.client.clone();
        Cmd::task(move || Msg::ProcessesLoaded(client.processes()))
    }

    /// Re-fetch the statistics snapshot.
    fn refresh_statistics(&self) -> Cmd<Msg> {
        let client = self.client.clone();
        Cmd::task(move || Msg::StatisticsLoaded(client.statistics()))
    }

    fn submit_form(&mut self) -> Cmd<Msg> {
        match self.form.build() {
            Ok(request) => {
                let client = self.client.clone();
                Cmd::task(move || Msg::AddFinished(client.add_process(&request)))
            }
            Err(reason) => {
                // Client-side validation: the engine never sees the request.
                self.notices.push(Severity::Error, reason.to_string());
                Cmd::none()
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Cmd<Msg> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Cmd::quit();
        }
        match self.focus {
            Focus::Actions => self.handle_action_key(key),
            Focus::Form => self.handle_form_key(key),
        }
    }

    fn handle_action_key(&mut self, key: KeyEvent) -> Cmd<Msg> {
        let KeyCode::Char(c) = key.code else {
            return Cmd::none();
        };
        let c = c.to_ascii_lowercase();
        match KEYMAP.iter().find(|(bound, _)| *bound == c) {
            Some((_, action)) => self.dispatch(*action),
            None => Cmd::none(),
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Cmd<Msg> {
        match key.code {
            KeyCode::Esc => {
                self.focus = Focus::Actions;
                Cmd::none()
            }
            KeyCode::Enter => self.dispatch(Action::AddProcess),
            KeyCode::Tab | KeyCode::Down => {
                self.form.next_field();
                Cmd::none()
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.form.prev_field();
                Cmd::none()
            }
            KeyCode::Backspace => {
                self.form.backspace();
                Cmd::none()
            }
            KeyCode::Left | KeyCode::Right => {
                if self.form.field == FormField::Queue {
                    self.form.toggle_queue();
                }
                Cmd::none()
            }
            KeyCode::Char(c) => {
                if self.form.field == FormField::Queue {
                    if c == ' ' {
                        self.form.toggle_queue();
                    }
                } else {
                    self.form.insert_char(c);
                }
                Cmd::none()
            }
            _ => Cmd::none(),
        }
    }

    /// Apply a step outcome: log at the pre-advance clock value, advance
    /// only for an executed process, refresh statistics from the payload,
    /// then re-pull the process list.
    fn apply_step(&mut self, result: Result<StepOutcome, ApiError>) -> Cmd<Msg> {
        self.step_in_flight = false;
        match result {
            Ok(outcome) => {
                let at = self.clock.value();
                if let Some(exec) = &outcome.process {
                    // The engine reports the source queue alongside every
                    // executed process; tolerate a nonconforming payload.
                    let queue = outcome.queue_type.unwrap_or(QueueType::Foreground);
                    self.log.record_execution(at, &exec.name, queue, exec.execution_time);
                    self.clock.advance(exec.execution_time);
                    info!(
                        name = %exec.name,
                        queue = %queue,
                        duration = exec.execution_time,
                        "step executed"
                    );
                } else {
                    self.log.record_idle(at);
                    info!(at, "idle tick");
                }
                self.stats = StatisticsSummary::from_snapshot(&outcome.statistics);
                self.refresh_processes()
            }
            Err(err) => {
                warn!(%err, "step failed");
                self.notices
                    .push(Severity::Error, err.operator_message(FALLBACK_STEP));
                Cmd::none()
            }
        }
    }

    fn apply_reset(&mut self, result: Result<(), ApiError>) -> Cmd<Msg> {
        match result {
            Ok(()) => {
                self.clock.reset();
                self.log.clear();
                self.notices.push(Severity::Success, "Simulation reset!");
                Cmd::batch(vec![self.refresh_processes(), self.refresh_statistics()])
            }
            Err(err) => {
                self.notices
                    .push(Severity::Error, err.operator_message(FALLBACK_RESET));
                Cmd::none()
            }
        }
    }

    fn apply_add(&mut self, result: Result<AddReceipt, ApiError>) -> Cmd<Msg> {
        match result {
            Ok(receipt) => {
                let message = if receipt.message.is_empty() {
                    "Process added successfully!".to_owned()
                } else {
                    receipt.message
                };
                self.notices.push(Severity::Success, message);
                self.form.clear();
                self.focus = Focus::Actions;
                self.refresh_processes()
            }
            Err(err) => {
                self.notices
                    .push(Severity::Error, err.operator_message(FALLBACK_ADD));
                Cmd::none()
            }
        }
    }

    fn apply_save(&mut self, result: Result<SaveReceipt, ApiError>) -> Cmd<Msg> {
        match result {
            Ok(receipt) => {
                let message = if receipt.message.is_empty() {
                    "Simulation results saved successfully!".to_owned()
                } else {
                    receipt.message
                };
                debug!(results = ?receipt.results, "saved results");
                self.notices.push(Severity::Success, message);
                Cmd::none()
            }
            Err(err) => {
                self.notices
                    .push(Severity::Error, err.operator_message(FALLBACK_SAVE));
                Cmd::none()
            }
        }
    }
}

impl Model for Session {
    type Message = Msg;

    /// The original controller fetches processes and statistics
    /// immediately on construction.
    fn init(&mut self) -> Cmd<Msg> {
        Cmd::batch(vec![self.refresh_processes(), self.refresh_statistics()])
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::Key(key) => self.handle_key(key),
            Msg::Noop => Cmd::none(),
            Msg::ProcessesLoaded(Ok(records)) => {
                self.processes = records;
                Cmd::none()
            }
            Msg::ProcessesLoaded(Err(err)) => {
                // Background refresh: logged, not surfaced as a notification.
                warn!(%err, "process refresh failed");
                Cmd::none()
            }
            Msg::StatisticsLoaded(Ok(snapshot)) => {
                self.stats = StatisticsSummary::from_snapshot(&snapshot);
                Cmd::none()
            }
            Msg::StatisticsLoaded(Err(err)) => {
                warn!(%err, "statistics refresh failed");
                Cmd::none()
            }
            Msg::StepFinished(result) => self.apply_step(result),
            Msg::AddFinished(result) => self.apply_add(result),
            Msg::StartFinished(Ok(())) => {
                self.notices.push(Severity::Success, "Simulation started!");
                self.refresh_processes()
            }
            Msg::StartFinished(Err(err)) => {
                self.notices
                    .push(Severity::Error, err.operator_message(FALLBACK_START));
                Cmd::none()
            }
            Msg::SaveFinished(result) => self.apply_save(result),
            Msg::ResetFinished(result) => self.apply_reset(result),
            Msg::HistoryLoaded(Ok(entries)) => {
                self.history = Some(entries);
                Cmd::none()
            }
            Msg::HistoryLoaded(Err(err)) => {
                self.notices
                    .push(Severity::Error, err.operator_message(FALLBACK_HISTORY));
                Cmd::none()
            }
        }
    }

    fn view(&self, frame: &mut ratatui::Frame) {
        crate::ui::render(frame, self);
    }

    fn tick(&mut self) -> Cmd<Msg> {
        self.notices.expire(Instant::now(), DEFAULT_NOTIFICATION_TTL);
        Cmd::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schedtui_client::DEFAULT_TIMEOUT;
    use schedtui_core::{ExecutedProcess, LogEntry};

    /// A client pointed at a dead address; tests never let a command's
    /// task closure run, so nothing connects.
    fn session() -> Session {
        let client = EngineClient::new("http://127.0.0.1:1", DEFAULT_TIMEOUT).unwrap();
        Session::new(client)
    }

    fn executed_step(name: &str, queue: QueueType, duration: u64) -> StepOutcome {
        StepOutcome {
            process: Some(ExecutedProcess {
                pid: Some(1),
                name: name.to_owned(),
                execution_time: duration,
                remaining_time: 0,
            }),
            queue_type: Some(queue),
            message: None,
            statistics: StatisticsSnapshot {
                current_time: Some(duration),
                ..StatisticsSnapshot::default()
            },
        }
    }

    fn idle_step() -> StepOutcome {
        StepOutcome {
            process: None,
            queue_type: None,
            message: Some("No processes to execute".to_owned()),
            statistics: StatisticsSnapshot::default(),
        }
    }

    #[test]
    fn executed_step_logs_pre_advance_time_then_advances() {
        let mut session = session();
        let cmd = session.update(Msg::StepFinished(Ok(executed_step(
            "P1",
            QueueType::Foreground,
            4,
        ))));
        assert_eq!(
            session.log.entries(),
            &[LogEntry::Executed {
                at: 0,
                name: "P1".to_owned(),
                queue: QueueType::Foreground,
                duration: 4,
            }]
        );
        assert_eq!(session.clock.value(), 4);
        assert_eq!(session.stats.current_time, 4);
        // The registry re-pulls after the mutation.
        assert_eq!(cmd.type_name(), "Task");
    }

    #[test]
    fn idle_step_logs_but_never_advances() {
        let mut session = session();
        session
            .update(Msg::StepFinished(Ok(executed_step("P1", QueueType::Background, 4))));
        session.update(Msg::StepFinished(Ok(idle_step())));
        assert_eq!(session.clock.value(), 4);
        assert_eq!(session.log.entries()[1], LogEntry::Idle { at: 4 });
    }

    #[test]
    fn failed_step_touches_neither_clock_nor_log() {
        let mut session = session();
        let cmd = session.update(Msg::StepFinished(Err(ApiError::Rejected {
            status: 400,
            message: "No process available".to_owned(),
        })));
        assert_eq!(session.clock.value(), 0);
        assert!(session.log.is_empty());
        assert_eq!(cmd.type_name(), "None");
        let notice = session.notices.latest().unwrap();
        assert_eq!(notice.severity, Severity::Error);
        assert_eq!(notice.message, "No process available");
    }

    #[test]
    fn step_failure_without_server_text_uses_the_fallback() {
        let mut session = session();
        session.update(Msg::StepFinished(Err(ApiError::Rejected {
            status: 500,
            message: String::new(),
        })));
        assert_eq!(
            session.notices.latest().unwrap().message,
            "Error executing simulation step"
        );
    }

    #[test]
    fn concurrent_step_intents_are_dropped() {
        let mut session = session();
        assert_eq!(session.dispatch(Action::StepSimulation).type_name(), "Task");
        assert!(session.step_in_flight());
        // Second intent while the first is outstanding: dropped.
        assert_eq!(session.dispatch(Action::StepSimulation).type_name(), "None");
        // The outcome message re-arms the guard.
        session.update(Msg::StepFinished(Ok(idle_step())));
        assert!(!session.step_in_flight());
        assert_eq!(session.dispatch(Action::StepSimulation).type_name(), "Task");
    }

    #[test]
    fn reset_clears_clock_and_log_and_refetches_both_views() {
        let mut session = session();
        session
            .update(Msg::StepFinished(Ok(executed_step("P1", QueueType::Foreground, 7))));
        let cmd = session.update(Msg::ResetFinished(Ok(())));
        assert_eq!(session.clock.value(), 0);
        assert!(session.log.is_empty());
        assert_eq!(session.notices.latest().unwrap().message, "Simulation reset!");
        match cmd {
            Cmd::Batch(cmds) => {
                assert_eq!(cmds.len(), 2);
                assert!(cmds.iter().all(|c| c.type_name() == "Task"));
            }
            other => panic!("expected Batch of refreshes, got {other:?}"),
        }
    }

    #[test]
    fn add_success_clears_the_form_and_refreshes() {
        let mut session = session();
        session.form.name = "P9".to_owned();
        session.form.arrival = "1".to_owned();
        session.focus = Focus::Form;
        let cmd = session.update(Msg::AddFinished(Ok(AddReceipt {
            message: "Process added successfully".to_owned(),
            pid: Some(9),
        })));
        assert!(session.form.name.is_empty());
        assert_eq!(session.focus, Focus::Actions);
        assert_eq!(cmd.type_name(), "Task");
    }

    #[test]
    fn invalid_form_is_rejected_client_side() {
        let mut session = session();
        session.form.name = "P1".to_owned();
        session.form.arrival = "soon".to_owned();
        let cmd = session.dispatch(Action::AddProcess);
        assert_eq!(cmd.type_name(), "None");
        let notice = session.notices.latest().unwrap();
        assert_eq!(notice.severity, Severity::Error);
        assert_eq!(notice.message, "arrival time must be a non-negative integer");
    }

    #[test]
    fn empty_history_is_recorded_as_explicitly_empty() {
        let mut session = session();
        assert!(session.history.is_none());
        session.update(Msg::HistoryLoaded(Ok(Vec::new())));
        // Explicitly empty, distinct from never loaded.
        assert_eq!(session.history.as_deref().map(<[HistoryEntry]>::len), Some(0));
    }

    #[test]
    fn keymap_routes_every_bound_action() {
        let mut session = session();
        let step = session.update(Msg::Key(KeyEvent::new(
            KeyCode::Char('n'),
            KeyModifiers::NONE,
        )));
        assert_eq!(step.type_name(), "Task");
        let quit = session.update(Msg::Key(KeyEvent::new(
            KeyCode::Char('q'),
            KeyModifiers::NONE,
        )));
        assert_eq!(quit.type_name(), "Quit");
        session.update(Msg::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)));
        assert_eq!(session.focus, Focus::Form);
    }
}
