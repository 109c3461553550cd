#![forbid(unsafe_code)]

//! The HTTP/JSON contract with the remote scheduling engine.
//!
//! One method per engine operation, all blocking: the runtime executes
//! these on background task threads, so no async executor is involved.
//! Every response body is read as text first and decoded with
//! `serde_json`, which lets a non-success status yield its structured
//! `{"error": ...}` payload and a success status yield the typed shape.
//!
//! No call is retried automatically; a failure surfaces to the caller
//! and the operator re-triggers the action if desired.

use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use schedtui_core::{
    AddReceipt, HistoryEntry, NewProcess, ProcessRecord, SaveReceipt, StatisticsSnapshot,
    StepOutcome,
};

use crate::error::{ApiError, ApiResult};

/// Default transport-level timeout for engine calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Structured failure body: `{"error": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
}

/// Client for one engine deployment.
#[derive(Debug, Clone)]
pub struct EngineClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl EngineClient {
    /// Build a client for the engine at `base_url`
    /// (e.g. `http://127.0.0.1:5000`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        let http = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, http })
    }

    /// The engine base URL this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// List all process records.
    pub fn processes(&self) -> ApiResult<Vec<ProcessRecord>> {
        self.get("/api/processes")
    }

    /// Submit a new process.
    pub fn add_process(&self, process: &NewProcess) -> ApiResult<AddReceipt> {
        let response = self
            .http
            .post(self.url("/api/processes"))
            .json(process)
            .send()?;
        Self::decode(response)
    }

    /// Start the simulation (the engine loads persisted processes).
    pub fn start(&self) -> ApiResult<()> {
        self.post_unit("/api/simulation/start")
    }

    /// Execute one scheduling step.
    pub fn step(&self) -> ApiResult<StepOutcome> {
        self.post("/api/simulation/step")
    }

    /// Save the current run's statistics as a history entry.
    pub fn save(&self) -> ApiResult<SaveReceipt> {
        self.post("/api/simulation/save")
    }

    /// Reset the simulation, clearing all engine-side processes.
    pub fn reset(&self) -> ApiResult<()> {
        self.post_unit("/api/simulation/reset")
    }

    /// Fetch the current statistics snapshot.
    pub fn statistics(&self) -> ApiResult<StatisticsSnapshot> {
        self.get("/api/simulation/statistics")
    }

    /// Fetch all saved simulation runs, in engine order.
    pub fn history(&self) -> ApiResult<Vec<HistoryEntry>> {
        self.get("/api/simulation/history")
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.http.get(self.url(path)).send()?;
        Self::decode(response)
    }

    fn post<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.http.post(self.url(path)).send()?;
        Self::decode(response)
    }

    /// POST where the success body is acknowledged but not consumed.
    fn post_unit(&self, path: &str) -> ApiResult<()> {
        let response = self.http.post(self.url(path)).send()?;
        let status = response.status();
        let body = response.text()?;
        if status.is_success() {
            debug!(path, status = status.as_u16(), "engine call ok");
            Ok(())
        } else {
            Err(Self::rejection(status.as_u16(), &body))
        }
    }

    fn decode<T: DeserializeOwned>(response: reqwest::blocking::Response) -> ApiResult<T> {
        let status = response.status();
        let body = response.text()?;
        if status.is_success() {
            debug!(status = status.as_u16(), "engine call ok");
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(Self::rejection(status.as_u16(), &body))
        }
    }

    fn rejection(status: u16, body: &str) -> ApiError {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.error)
            .unwrap_or_default();
        warn!(status, %message, "engine rejected request");
        ApiError::Rejected { status, message }
    }
}
