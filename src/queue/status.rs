//! # Queue lifecycle status.
//!
//! Exactly one [`QueueStatus`] value is active at any time. Transitions:
//!
//! ```text
//! Idle ──────────► Processing     pending became non-empty, loop started
//! Processing ────► Paused         pause() or task failure under pause-on-error
//! Paused ────────► Processing     resume()
//! Processing ────► Idle           pending drained, no cancellation
//! any ───────────► Cancelled      cancel() from any non-cancelled state
//! Cancelled ─────► Idle           new submission resurrects the queue
//! ```
//!
//! Re-entering the current status is a no-op and fires no notification.

use std::fmt;

/// Lifecycle status of a [`Queue`](crate::Queue).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueStatus {
    /// No pending work, no execution loop. Initial state and drain terminal.
    Idle,

    /// Execution loop is running or about to run a task.
    Processing,

    /// Execution loop alive but blocked awaiting a resume signal.
    Paused,

    /// Terminal until resurrected by a new submission.
    Cancelled,
}

impl QueueStatus {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            QueueStatus::Idle => "idle",
            QueueStatus::Processing => "processing",
            QueueStatus::Paused => "paused",
            QueueStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
