#![forbid(unsafe_code)]

//! Elm-style runtime for the controller.
//!
//! The runtime separates state (Model) from rendering (view) and routes
//! all side effects through the command pattern: `update()` returns a
//! [`Cmd`], and blocking work — every remote engine call — runs as
//! [`Cmd::Task`] on a spawned thread whose result re-enters `update()`
//! as a message over an mpsc channel. The update/view loop itself stays
//! single-threaded; suspension happens only at the task boundary, and a
//! slow call delays nothing but its own completion message.

use std::io;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, error};

/// Application state and behavior.
pub trait Model: Sized {
    /// Messages that drive state transitions. Must be convertible from
    /// raw terminal events.
    type Message: From<Event> + Send + 'static;

    /// Startup commands, executed once before the first frame.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// The core state transition function.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Render the current state.
    fn view(&self, frame: &mut ratatui::Frame);

    /// Called when the event poll times out with no input.
    fn tick(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }
}

/// A side effect requested by the model.
#[derive(Default)]
pub enum Cmd<M> {
    /// No operation.
    #[default]
    None,
    /// Stop the program.
    Quit,
    /// Feed a message straight back into `update()`.
    Msg(M),
    /// Execute multiple commands in order.
    Batch(Vec<Cmd<M>>),
    /// Run a blocking operation on a background thread; its return
    /// value comes back to `update()` as a message.
    Task(Box<dyn FnOnce() -> M + Send>),
}

impl<M> Cmd<M> {
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    #[inline]
    pub fn quit() -> Self {
        Self::Quit
    }

    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    /// Collapse a command list: empty becomes `None`, a single command
    /// stays bare.
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds
            .into_iter()
            .filter(|c| !matches!(c, Self::None))
            .collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.remove(0),
            _ => Self::Batch(cmds),
        }
    }

    /// Create a background task command.
    pub fn task<F>(f: F) -> Self
    where
        F: FnOnce() -> M + Send + 'static,
    {
        Self::Task(Box::new(f))
    }

    /// Stable name for tracing and tests.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Quit => "Quit",
            Self::Msg(_) => "Msg",
            Self::Batch(_) => "Batch",
            Self::Task(_) => "Task",
        }
    }
}

impl<M: std::fmt::Debug> std::fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Quit => write!(f, "Quit"),
            Self::Msg(m) => f.debug_tuple("Msg").field(m).finish(),
            Self::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
            Self::Task(_) => write!(f, "Task(..)"),
        }
    }
}

/// Restores the terminal on drop, so a failing update cannot leave the
/// operator's shell in raw mode.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        crossterm::execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// The update/view loop driver.
pub struct Program<M: Model> {
    model: M,
    tick_rate: Duration,
    running: bool,
    task_tx: mpsc::Sender<M::Message>,
    task_rx: mpsc::Receiver<M::Message>,
    task_handles: Vec<JoinHandle<()>>,
}

impl<M: Model> Program<M> {
    #[must_use]
    pub fn new(model: M, tick_rate: Duration) -> Self {
        let (task_tx, task_rx) = mpsc::channel();
        Self {
            model,
            tick_rate,
            running: true,
            task_tx,
            task_rx,
            task_handles: Vec::new(),
        }
    }

    /// Run until the model quits. The terminal is restored on every
    /// exit path.
    pub fn run(&mut self) -> io::Result<()> {
        let _guard = TerminalGuard::enter()?;
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        self.event_loop(&mut terminal)
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
        let cmd = self.model.init();
        self.execute_cmd(cmd);

        while self.running {
            terminal.draw(|frame| self.model.view(frame))?;

            // Completed background tasks re-enter update() before new input.
            while let Ok(msg) = self.task_rx.try_recv() {
                let cmd = self.model.update(msg);
                self.execute_cmd(cmd);
                if !self.running {
                    return Ok(());
                }
            }

            if event::poll(self.tick_rate)? {
                let msg = M::Message::from(event::read()?);
                let cmd = self.model.update(msg);
                self.execute_cmd(cmd);
            } else {
                let cmd = self.model.tick();
                self.execute_cmd(cmd);
            }

            self.reap_finished_tasks();
        }
        Ok(())
    }

    fn execute_cmd(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => {}
            Cmd::Quit => {
                debug!("quit requested");
                self.running = false;
            }
            Cmd::Msg(m) => {
                let next = self.model.update(m);
                self.execute_cmd(next);
            }
            Cmd::Batch(cmds) => {
                for c in cmds {
                    self.execute_cmd(c);
                    if !self.running {
                        break;
                    }
                }
            }
            Cmd::Task(f) => {
                let sender = self.task_tx.clone();
                let handle = thread::spawn(move || {
                    let msg = f();
                    let _ = sender.send(msg);
                });
                self.task_handles.push(handle);
            }
        }
    }

    fn reap_finished_tasks(&mut self) {
        if self.task_handles.is_empty() {
            return;
        }
        let mut remaining = Vec::with_capacity(self.task_handles.len());
        for handle in self.task_handles.drain(..) {
            if handle.is_finished() {
                if let Err(payload) = handle.join() {
                    let msg = if let Some(s) = payload.downcast_ref::<&str>() {
                        (*s).to_owned()
                    } else if let Some(s) = payload.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "unknown panic payload".to_owned()
                    };
                    error!("background task panicked: {msg}");
                }
            } else {
                remaining.push(handle);
            }
        }
        self.task_handles = remaining;
    }
}
