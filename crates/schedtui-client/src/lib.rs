#![forbid(unsafe_code)]

//! Blocking HTTP client for the remote MLQ scheduling engine.
//!
//! The engine owns all scheduling state; this crate only speaks the
//! fixed HTTP/JSON contract: list/add processes, start/step/save/reset
//! the simulation, and fetch statistics and history. Responses decode
//! into the wire types from `schedtui-core`.
//!
//! # Key Components
//!
//! - [`EngineClient`] - one method per engine operation
//! - [`ApiError`] - the three-way failure taxonomy (transport, rejected,
//!   malformed) with per-action operator fallback messages

pub mod api;
pub mod error;

pub use api::{DEFAULT_TIMEOUT, EngineClient};
pub use error::{ApiError, ApiResult};
