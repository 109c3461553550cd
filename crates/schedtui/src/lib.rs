#![forbid(unsafe_code)]

//! Terminal controller for a remote MLQ process-scheduling engine.
//!
//! The client schedules nothing itself. It drives the engine
//! step-by-step over HTTP, keeps a locally derived simulated clock, and
//! renders the engine's reported state for an operator. After every
//! mutating action the affected views re-fetch authoritative state in
//! full; the engine is the sole source of truth and the client holds no
//! durable write-ahead state.
//!
//! # Key Components
//!
//! - [`runtime`] - Elm-style update/view loop with background task commands
//! - [`session`] - the step controller, dispatch table, and owned UI state
//! - [`form`] - add-process form with client-side integer validation
//! - [`ui`] - ratatui projection of session state
//! - [`cli`] - argument parsing with environment overrides

pub mod cli;
pub mod form;
pub mod runtime;
pub mod session;
pub mod ui;
