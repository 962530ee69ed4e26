//! # Queue configuration.
//!
//! Provides [`QueueConfig`], the settings recognized at queue construction:
//!
//! - `pause_on_error`: when `true`, a task failure pauses the queue and
//!   records the error instead of silently continuing (default `false`).
//! - `on_status_change`: optional [`StatusHook`] invoked with the new status
//!   on every real transition. It fires once immediately with the initial
//!   `Idle` status at construction, then only when the value actually changes.
//!
//! ## Notes
//! The hook is called outside the queue's internal lock, so it may safely
//! call back into the queue (submit a follow-up task, pause, cancel).

use std::fmt;
use std::sync::Arc;

use crate::queue::QueueStatus;

/// Callback invoked with the new status on every real transition.
///
/// Shared and `Send + Sync` so it can be fired from both caller context and
/// the execution loop.
pub type StatusHook = Arc<dyn Fn(QueueStatus) + Send + Sync>;

/// Configuration for a [`Queue`](crate::Queue).
///
/// ## Example
/// ```
/// use std::sync::Arc;
/// use taskline::QueueConfig;
///
/// let cfg = QueueConfig {
///     pause_on_error: true,
///     on_status_change: Some(Arc::new(|status| {
///         println!("queue is now {status}");
///     })),
/// };
/// assert!(cfg.pause_on_error);
/// ```
#[derive(Default)]
pub struct QueueConfig {
    /// Pause the queue and record the error when a task fails.
    ///
    /// - `false` (default): failures are fully absorbed; the loop proceeds
    ///   to the next pending entry and no trace of the failure is retained.
    /// - `true`: the failure is captured into the last-error slot, the queue
    ///   transitions to `Paused`, and the loop suspends until `resume()`.
    pub pause_on_error: bool,

    /// Status-change notification hook.
    ///
    /// Fired once with `Idle` at construction, then exactly once per real
    /// transition. Re-entering the same status never fires it.
    pub on_status_change: Option<StatusHook>,
}

impl fmt::Debug for QueueConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueConfig")
            .field("pause_on_error", &self.pause_on_error)
            .field("on_status_change", &self.on_status_change.is_some())
            .finish()
    }
}
