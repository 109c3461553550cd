#![forbid(unsafe_code)]

//! Non-blocking operator notifications.
//!
//! Remote-call outcomes surface as `{severity, message}` events pushed
//! onto a queue that the view layer drains and displays; nothing blocks
//! waiting for acknowledgment. Messages default to a per-action fallback
//! when the engine supplies none, so the queue never carries an empty
//! string.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How long a notification stays visible unless dismissed earlier.
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Unique identifier for a posted notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(pub u64);

/// Severity tag carried by every notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

impl Severity {
    /// Single-character marker for compact rendering.
    pub fn icon(self) -> char {
        match self {
            Self::Success => '\u{2713}', // ✓
            Self::Error => '\u{2717}',   // ✗
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// One operator-facing notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: NotificationId,
    pub severity: Severity,
    pub message: String,
    posted: Instant,
}

impl Notification {
    /// Age relative to `now`.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.posted)
    }
}

/// FIFO queue of pending notifications.
///
/// Producers push; the view layer reads the most recent entries and the
/// update loop expires old ones on each tick.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    entries: VecDeque<Notification>,
    next_id: u64,
}

impl NotificationQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Post a notification and return its id.
    pub fn push(&mut self, severity: Severity, message: impl Into<String>) -> NotificationId {
        let id = NotificationId(self.next_id);
        self.next_id += 1;
        self.entries.push_back(Notification {
            id,
            severity,
            message: message.into(),
            posted: Instant::now(),
        });
        id
    }

    /// Drop entries older than `ttl` as of `now`.
    pub fn expire(&mut self, now: Instant, ttl: Duration) {
        self.entries.retain(|n| n.age(now) < ttl);
    }

    /// Dismiss a specific notification, if still queued.
    pub fn dismiss(&mut self, id: NotificationId) {
        self.entries.retain(|n| n.id != id);
    }

    /// The most recently posted entry still alive.
    pub fn latest(&self) -> Option<&Notification> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
